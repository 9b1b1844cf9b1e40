use std::collections::HashSet;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::models::{self, NewCourse, NewEnrollment, NewFriendship, NewUser};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("database connection error")]
    Connection(#[from] diesel::result::ConnectionError),

    #[error("database query error")]
    Query(#[from] diesel::result::Error),

    #[error("database migration error: {0}")]
    Migration(String),

    #[error("already enrolled in this course")]
    AlreadyEnrolled,

    #[error("not enrolled in this course")]
    NotEnrolled,

    #[error("{0}")]
    Validation(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Counters returned by a catalog write, consumed by the reconciler's
/// end-of-run report. A code repeated within one batch counts as
/// `skipped_duplicate`, not `skipped_existing`.
#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub struct CatalogStats {
    pub inserted: usize,
    pub skipped_existing: usize,
    pub skipped_duplicate: usize,
}

pub struct DBConnection {
    conn: SqliteConnection,
}

impl DBConnection {
    pub fn new() -> Result<DBConnection> {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "coursehub.db".to_string());

        Self::open(&database_url)
    }

    pub fn open(database_url: &str) -> Result<DBConnection> {
        let mut conn = SqliteConnection::establish(database_url)?;
        conn.batch_execute("PRAGMA foreign_keys = ON;")?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| Error::Migration(e.to_string()))?;

        Ok(DBConnection { conn })
    }

    // --- users ---

    /// Upsert by external subject id, called after every successful login.
    /// Existing profile fields are never overwritten here.
    pub fn ensure_user(
        &mut self,
        user_subject: &str,
        user_name: &str,
        user_email: &str,
    ) -> Result<models::Id> {
        use crate::schema::users::dsl::*;

        let select_existing = users
            .select(id)
            .filter(subject_id.eq(user_subject))
            .get_result(&mut self.conn)
            .ok();

        match select_existing {
            Some(existing_user_id) => {
                log::trace!("DB: user already exists {user_subject:?}");
                Ok(existing_user_id)
            }
            None => {
                log::trace!("DB: inserting new user {user_subject:?}");
                diesel::insert_into(users)
                    .values(&NewUser {
                        subject_id: user_subject,
                        username: user_name,
                        email: user_email,
                    })
                    .returning(id)
                    .get_result(&mut self.conn)
                    .map_err(|e| e.into())
            }
        }
    }

    pub fn get_user(&mut self, desired_id: models::Id) -> Option<models::User> {
        use crate::schema::users::dsl::*;

        users
            .filter(id.eq(desired_id))
            .select(models::User::as_select())
            .get_result(&mut self.conn)
            .ok()
    }

    pub fn get_user_by_subject(&mut self, user_subject: &str) -> Option<models::User> {
        use crate::schema::users::dsl::*;

        users
            .filter(subject_id.eq(user_subject))
            .select(models::User::as_select())
            .get_result(&mut self.conn)
            .ok()
    }

    pub fn update_profile(
        &mut self,
        user: models::Id,
        changes: &models::ProfileUpdate,
    ) -> Result<()> {
        use crate::schema::users::dsl::*;

        diesel::update(users.filter(id.eq(user)))
            .set(changes)
            .execute(&mut self.conn)?;

        Ok(())
    }

    // --- courses ---

    pub fn get_all_courses(&mut self) -> Result<Vec<models::Course>> {
        use crate::schema::courses::dsl::*;

        courses
            .order(course_code.asc())
            .select(models::Course::as_select())
            .load(&mut self.conn)
            .map_err(|e| e.into())
    }

    pub fn count_courses(&mut self) -> Result<i64> {
        use crate::schema::courses::dsl::*;

        courses
            .count()
            .get_result(&mut self.conn)
            .map_err(|e| e.into())
    }

    pub fn get_course_by_code(&mut self, code: &str) -> Option<models::Course> {
        use crate::schema::courses::dsl::*;

        courses
            .filter(course_code.eq(code))
            .select(models::Course::as_select())
            .get_result(&mut self.conn)
            .ok()
    }

    pub fn course_exists(&mut self, code: &str) -> Result<bool> {
        Self::course_taken(&mut self.conn, code)
    }

    /// Insert every course whose code is not already present; rows that
    /// share a code with an existing course are left untouched, and a code
    /// repeated within the batch is taken once (first occurrence wins). The
    /// whole batch commits as one transaction.
    pub fn merge_courses(&mut self, batch: &[NewCourse]) -> Result<CatalogStats> {
        self.conn.transaction(|conn| {
            let mut seen = HashSet::new();
            let mut stats = CatalogStats::default();
            for course in batch {
                if !seen.insert(course.course_code.as_str()) {
                    log::trace!("DB: duplicate in batch {:?}", course.course_code);
                    stats.skipped_duplicate += 1;
                    continue;
                }
                if Self::course_taken(conn, &course.course_code)? {
                    log::trace!("DB: course already exists {:?}", course.course_code);
                    stats.skipped_existing += 1;
                    continue;
                }
                log::trace!("DB: inserting new course {:?}", course.course_code);
                diesel::insert_into(crate::schema::courses::table)
                    .values(course)
                    .execute(conn)?;
                stats.inserted += 1;
            }
            Ok(stats)
        })
    }

    /// Drop the whole catalog and insert the batch in its place. Delete and
    /// insert share one transaction: a failure mid-batch rolls back to the
    /// prior catalog, and readers never observe an empty table.
    pub fn replace_courses(&mut self, batch: &[NewCourse]) -> Result<CatalogStats> {
        self.conn.transaction(|conn| {
            diesel::delete(crate::schema::courses::table).execute(conn)?;

            let mut seen = HashSet::new();
            let mut stats = CatalogStats::default();
            for course in batch {
                if !seen.insert(course.course_code.as_str()) {
                    log::trace!("DB: duplicate in batch {:?}", course.course_code);
                    stats.skipped_duplicate += 1;
                    continue;
                }
                diesel::insert_into(crate::schema::courses::table)
                    .values(course)
                    .execute(conn)?;
                stats.inserted += 1;
            }
            Ok(stats)
        })
    }

    fn course_taken(conn: &mut SqliteConnection, code: &str) -> Result<bool> {
        use crate::schema::courses::dsl::*;

        let count = courses
            .filter(course_code.eq(code))
            .count()
            .get_result::<i64>(conn)?;

        Ok(count > 0)
    }

    // --- enrollments ---

    /// Enroll a user in a course. The (user, course) pair is the primary
    /// key, so a second join is reported as `AlreadyEnrolled` rather than
    /// producing a second row, and a concurrent join that loses the race
    /// surfaces the unique-constraint violation as the same outcome.
    pub fn join_course(
        &mut self,
        user: models::Id,
        course: models::Id,
        enroll_status: &str,
        enroll_term: &str,
    ) -> Result<()> {
        use crate::schema::enrollments::dsl::*;

        if enroll_status.trim().is_empty() {
            return Err(Error::Validation("enrollment status must not be empty"));
        }
        if enroll_term.trim().is_empty() {
            return Err(Error::Validation("enrollment term must not be empty"));
        }

        let select_existing: Option<(models::Id, models::Id)> = enrollments
            .select((user_id, course_id))
            .filter(user_id.eq(user).and(course_id.eq(course)))
            .get_result(&mut self.conn)
            .ok();

        if select_existing.is_some() {
            log::trace!("DB: user {user} already enrolled in course {course}");
            return Err(Error::AlreadyEnrolled);
        }

        let inserted = diesel::insert_into(enrollments)
            .values(&NewEnrollment {
                user_id: user,
                course_id: course,
                status: enroll_status,
                term: enroll_term,
            })
            .execute(&mut self.conn);

        match inserted {
            Ok(_) => {
                log::trace!("DB: user {user} joined course {course}");
                Ok(())
            }
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(Error::AlreadyEnrolled)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn leave_course(&mut self, user: models::Id, course: models::Id) -> Result<()> {
        use crate::schema::enrollments::dsl::*;

        let deleted =
            diesel::delete(enrollments.filter(user_id.eq(user).and(course_id.eq(course))))
                .execute(&mut self.conn)?;

        if deleted == 0 {
            return Err(Error::NotEnrolled);
        }

        log::trace!("DB: user {user} left course {course}");
        Ok(())
    }

    pub fn get_enrollment(
        &mut self,
        user: models::Id,
        course: models::Id,
    ) -> Option<models::Enrollment> {
        use crate::schema::enrollments::dsl::*;

        enrollments
            .filter(user_id.eq(user).and(course_id.eq(course)))
            .select(models::Enrollment::as_select())
            .get_result(&mut self.conn)
            .ok()
    }

    pub fn get_user_enrollments(&mut self, user: models::Id) -> Result<Vec<models::Enrollment>> {
        use crate::schema::enrollments::dsl::*;

        enrollments
            .filter(user_id.eq(user))
            .select(models::Enrollment::as_select())
            .load(&mut self.conn)
            .map_err(|e| e.into())
    }

    pub fn get_user_courses(&mut self, user: models::Id) -> Result<Vec<models::Course>> {
        use crate::schema::courses::dsl::*;
        use crate::schema::enrollments::dsl::*;

        let rows: Vec<models::Enrollment> = enrollments
            .filter(user_id.eq(user))
            .select(models::Enrollment::as_select())
            .get_results(&mut self.conn)?;

        let course_ids = rows.into_iter().map(|e| e.course_id).collect::<Vec<_>>();

        let r = courses
            .filter(id.eq_any(course_ids))
            .select(models::Course::as_select())
            .get_results(&mut self.conn)?;

        Ok(r)
    }

    pub fn get_course_members(&mut self, course: models::Id) -> Result<Vec<models::User>> {
        use crate::schema::enrollments::dsl::*;
        use crate::schema::users::dsl::*;

        let rows: Vec<models::Enrollment> = enrollments
            .filter(course_id.eq(course))
            .select(models::Enrollment::as_select())
            .get_results(&mut self.conn)?;

        let user_ids = rows.into_iter().map(|e| e.user_id).collect::<Vec<_>>();

        let r = users
            .filter(id.eq_any(user_ids))
            .select(models::User::as_select())
            .get_results(&mut self.conn)?;

        Ok(r)
    }

    // --- questions and answers ---

    pub fn insert_question(
        &mut self,
        course: models::Id,
        author: models::Id,
        question_title: &str,
        question_content: &str,
    ) -> Result<models::Id> {
        use crate::schema::questions::dsl::*;

        diesel::insert_into(questions)
            .values(&models::NewQuestion {
                course_id: course,
                user_id: author,
                title: question_title,
                content: question_content,
            })
            .returning(id)
            .get_result(&mut self.conn)
            .map_err(|e| e.into())
    }

    pub fn get_course_questions(&mut self, course: models::Id) -> Result<Vec<models::Question>> {
        use crate::schema::questions::dsl::*;

        questions
            .filter(course_id.eq(course))
            .order(created_at.asc())
            .select(models::Question::as_select())
            .load(&mut self.conn)
            .map_err(|e| e.into())
    }

    /// Deleting a question removes its answers in the same transaction, so
    /// no orphaned answers survive a partial failure.
    pub fn delete_question(&mut self, question: models::Id) -> Result<()> {
        self.conn.transaction(|conn| {
            {
                use crate::schema::answers::dsl::*;
                diesel::delete(answers.filter(question_id.eq(question))).execute(conn)?;
            }
            use crate::schema::questions::dsl::*;
            diesel::delete(questions.filter(id.eq(question))).execute(conn)?;

            Ok(())
        })
    }

    pub fn insert_answer(
        &mut self,
        question: models::Id,
        author: models::Id,
        answer_content: &str,
    ) -> Result<models::Id> {
        use crate::schema::answers::dsl::*;

        diesel::insert_into(answers)
            .values(&models::NewAnswer {
                question_id: question,
                user_id: author,
                content: answer_content,
            })
            .returning(id)
            .get_result(&mut self.conn)
            .map_err(|e| e.into())
    }

    pub fn get_question_answers(&mut self, question: models::Id) -> Result<Vec<models::Answer>> {
        use crate::schema::answers::dsl::*;

        answers
            .filter(question_id.eq(question))
            .order(created_at.asc())
            .select(models::Answer::as_select())
            .load(&mut self.conn)
            .map_err(|e| e.into())
    }

    // --- documents ---

    pub fn insert_document(
        &mut self,
        course: models::Id,
        uploader: models::Id,
        file_name: &str,
    ) -> Result<models::Id> {
        use crate::schema::documents::dsl::*;

        diesel::insert_into(documents)
            .values(&models::NewDocument {
                course_id: course,
                user_id: uploader,
                filename: file_name,
            })
            .returning(id)
            .get_result(&mut self.conn)
            .map_err(|e| e.into())
    }

    pub fn get_course_documents(&mut self, course: models::Id) -> Result<Vec<models::Document>> {
        use crate::schema::documents::dsl::*;

        documents
            .filter(course_id.eq(course))
            .order(created_at.asc())
            .select(models::Document::as_select())
            .load(&mut self.conn)
            .map_err(|e| e.into())
    }

    // --- direct messages ---

    pub fn insert_message(
        &mut self,
        sender: models::Id,
        recipient: models::Id,
        message_content: &str,
    ) -> Result<models::Id> {
        use crate::schema::messages::dsl::*;

        if message_content.trim().is_empty() {
            return Err(Error::Validation("message content must not be empty"));
        }

        diesel::insert_into(messages)
            .values(&models::NewMessage {
                sender_id: sender,
                recipient_id: recipient,
                content: message_content,
            })
            .returning(id)
            .get_result(&mut self.conn)
            .map_err(|e| e.into())
    }

    /// Both directions of a two-party chat, oldest first.
    pub fn get_conversation(
        &mut self,
        one: models::Id,
        other: models::Id,
    ) -> Result<Vec<models::DirectMessage>> {
        use crate::schema::messages::dsl::*;

        messages
            .filter(
                (sender_id.eq(one).and(recipient_id.eq(other)))
                    .or(sender_id.eq(other).and(recipient_id.eq(one))),
            )
            .order((sent_at.asc(), id.asc()))
            .select(models::DirectMessage::as_select())
            .load(&mut self.conn)
            .map_err(|e| e.into())
    }

    // --- friendships ---

    /// Record a pending friend request; repeating a request returns the
    /// existing row's id instead of creating a second one.
    pub fn request_friendship(
        &mut self,
        requester: models::Id,
        requested: models::Id,
    ) -> Result<models::Id> {
        use crate::schema::friendships::dsl::*;

        if requester == requested {
            return Err(Error::Validation("cannot befriend yourself"));
        }

        let select_existing = friendships
            .select(id)
            .filter(requester_id.eq(requester).and(requested_id.eq(requested)))
            .get_result(&mut self.conn)
            .ok();

        match select_existing {
            Some(existing_id) => {
                log::trace!("DB: friend request already exists {requester} -> {requested}");
                Ok(existing_id)
            }
            None => diesel::insert_into(friendships)
                .values(&NewFriendship {
                    requester_id: requester,
                    requested_id: requested,
                })
                .returning(id)
                .get_result(&mut self.conn)
                .map_err(|e| e.into()),
        }
    }

    pub fn set_friendship_status(
        &mut self,
        friendship: models::Id,
        new_status: &str,
    ) -> Result<()> {
        use crate::schema::friendships::dsl::*;

        if new_status.trim().is_empty() {
            return Err(Error::Validation("friendship status must not be empty"));
        }

        diesel::update(friendships.filter(id.eq(friendship)))
            .set(status.eq(new_status))
            .execute(&mut self.conn)?;

        Ok(())
    }

    pub fn get_user_friendships(&mut self, user: models::Id) -> Result<Vec<models::Friendship>> {
        use crate::schema::friendships::dsl::*;

        friendships
            .filter(requester_id.eq(user).or(requested_id.eq(user)))
            .select(models::Friendship::as_select())
            .load(&mut self.conn)
            .map_err(|e| e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> DBConnection {
        DBConnection::open(":memory:").unwrap()
    }

    fn course(code: &str) -> NewCourse {
        NewCourse {
            course_code: code.to_string(),
            title: String::new(),
            description: String::new(),
            subjects: String::new(),
            prerequisites: String::new(),
            external_ref: None,
        }
    }

    #[test]
    fn ensure_user_is_idempotent() {
        let mut db = test_db();

        let first = db.ensure_user("auth0|abc", "Alice", "alice@uni.edu").unwrap();
        let second = db
            .ensure_user("auth0|abc", "Alice A.", "other@uni.edu")
            .unwrap();

        assert_eq!(first, second);

        let user = db.get_user_by_subject("auth0|abc").unwrap();
        assert_eq!(user.username, "Alice");
        assert_eq!(user.email, "alice@uni.edu");
    }

    #[test]
    fn update_profile_only_touches_given_fields() {
        let mut db = test_db();
        let user = db.ensure_user("auth0|abc", "Alice", "alice@uni.edu").unwrap();

        db.update_profile(
            user,
            &models::ProfileUpdate {
                bio: Some("third year"),
                ..Default::default()
            },
        )
        .unwrap();

        let stored = db.get_user(user).unwrap();
        assert_eq!(stored.bio.as_deref(), Some("third year"));
        assert_eq!(stored.username, "Alice");
        assert!(stored.availability.is_none());
    }

    #[test]
    fn merge_skips_existing_courses() {
        let mut db = test_db();

        let stats = db
            .merge_courses(&[course("COMPSCI_300"), course("MATH_221")])
            .unwrap();
        assert_eq!(stats.inserted, 2);

        let stats = db
            .merge_courses(&[course("COMPSCI_300"), course("STAT_324")])
            .unwrap();
        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.skipped_existing, 1);
        assert_eq!(db.count_courses().unwrap(), 3);
    }

    #[test]
    fn merge_twice_equals_merge_once() {
        let mut db = test_db();
        let batch = [course("COMPSCI_300"), course("MATH_221")];

        db.merge_courses(&batch).unwrap();
        let before = db.get_all_courses().unwrap();

        let stats = db.merge_courses(&batch).unwrap();
        assert_eq!(stats.inserted, 0);
        assert_eq!(stats.skipped_existing, 2);
        assert_eq!(db.get_all_courses().unwrap(), before);
    }

    #[test]
    fn merge_drops_duplicates_within_batch() {
        let mut db = test_db();

        let stats = db
            .merge_courses(&[course("AAE_101"), course("AAE_101")])
            .unwrap();

        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.skipped_duplicate, 1);
        assert_eq!(stats.skipped_existing, 0);
        assert_eq!(db.count_courses().unwrap(), 1);
    }

    #[test]
    fn replace_counts_in_batch_duplicates_separately() {
        let mut db = test_db();

        let stats = db
            .replace_courses(&[course("AAE_101"), course("AAE_101")])
            .unwrap();

        assert_eq!(stats.inserted, 1);
        assert_eq!(stats.skipped_duplicate, 1);
        assert_eq!(stats.skipped_existing, 0);
        assert_eq!(db.count_courses().unwrap(), 1);
    }

    #[test]
    fn replace_leaves_exactly_the_new_batch() {
        let mut db = test_db();

        db.merge_courses(&[course("OLD_1"), course("OLD_2")]).unwrap();
        db.replace_courses(&[course("NEW_1"), course("NEW_2"), course("NEW_3")])
            .unwrap();

        let codes = db
            .get_all_courses()
            .unwrap()
            .into_iter()
            .map(|c| c.course_code)
            .collect::<Vec<_>>();
        assert_eq!(codes, vec!["NEW_1", "NEW_2", "NEW_3"]);
    }

    #[test]
    fn join_twice_reports_already_enrolled_and_keeps_first_row() {
        let mut db = test_db();
        let user = db.ensure_user("auth0|abc", "Alice", "alice@uni.edu").unwrap();
        db.merge_courses(&[course("COMPSCI_300")]).unwrap();
        let cid = db.get_course_by_code("COMPSCI_300").unwrap().id;

        db.join_course(user, cid, "enrolled", "Fall 2025").unwrap();
        let second = db.join_course(user, cid, "interested", "Spring 2026");
        assert!(matches!(second, Err(Error::AlreadyEnrolled)));

        let row = db.get_enrollment(user, cid).unwrap();
        assert_eq!(row.status, "enrolled");
        assert_eq!(row.term, "Fall 2025");
        assert_eq!(db.get_user_enrollments(user).unwrap().len(), 1);
    }

    #[test]
    fn join_rejects_empty_status_or_term() {
        let mut db = test_db();
        let user = db.ensure_user("auth0|abc", "Alice", "alice@uni.edu").unwrap();
        db.merge_courses(&[course("COMPSCI_300")]).unwrap();
        let cid = db.get_course_by_code("COMPSCI_300").unwrap().id;

        assert!(matches!(
            db.join_course(user, cid, "", "Fall 2025"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            db.join_course(user, cid, "enrolled", "  "),
            Err(Error::Validation(_))
        ));
        assert!(db.get_enrollment(user, cid).is_none());
    }

    #[test]
    fn leave_removes_the_row_entirely() {
        let mut db = test_db();
        let user = db.ensure_user("auth0|abc", "Alice", "alice@uni.edu").unwrap();
        db.merge_courses(&[course("COMPSCI_300")]).unwrap();
        let cid = db.get_course_by_code("COMPSCI_300").unwrap().id;

        db.join_course(user, cid, "enrolled", "Fall 2025").unwrap();
        db.leave_course(user, cid).unwrap();

        assert!(db.get_user_courses(user).unwrap().is_empty());
        assert!(db.get_enrollment(user, cid).is_none());
        assert!(matches!(db.leave_course(user, cid), Err(Error::NotEnrolled)));
    }

    #[test]
    fn course_members_lists_enrolled_users() {
        let mut db = test_db();
        let alice = db.ensure_user("auth0|a", "Alice", "alice@uni.edu").unwrap();
        let bob = db.ensure_user("auth0|b", "Bob", "bob@uni.edu").unwrap();
        db.merge_courses(&[course("COMPSCI_300"), course("MATH_221")])
            .unwrap();
        let cs = db.get_course_by_code("COMPSCI_300").unwrap().id;
        let math = db.get_course_by_code("MATH_221").unwrap().id;

        db.join_course(alice, cs, "enrolled", "Fall 2025").unwrap();
        db.join_course(bob, cs, "interested", "Fall 2025").unwrap();
        db.join_course(bob, math, "enrolled", "Fall 2025").unwrap();

        let members = db.get_course_members(cs).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(db.get_course_members(math).unwrap().len(), 1);
        assert_eq!(db.get_user_courses(alice).unwrap().len(), 1);
    }

    #[test]
    fn deleting_a_question_removes_its_answers() {
        let mut db = test_db();
        let user = db.ensure_user("auth0|abc", "Alice", "alice@uni.edu").unwrap();
        db.merge_courses(&[course("COMPSCI_300")]).unwrap();
        let cid = db.get_course_by_code("COMPSCI_300").unwrap().id;

        let q = db
            .insert_question(cid, user, "Midterm scope", "Is chapter 7 included?")
            .unwrap();
        db.insert_answer(q, user, "Yes, up to 7.3").unwrap();
        db.insert_answer(q, user, "Office hours said no").unwrap();

        db.delete_question(q).unwrap();

        assert!(db.get_course_questions(cid).unwrap().is_empty());
        assert!(db.get_question_answers(q).unwrap().is_empty());
    }

    #[test]
    fn conversation_includes_both_directions_in_order() {
        let mut db = test_db();
        let alice = db.ensure_user("auth0|a", "Alice", "alice@uni.edu").unwrap();
        let bob = db.ensure_user("auth0|b", "Bob", "bob@uni.edu").unwrap();
        let carol = db.ensure_user("auth0|c", "Carol", "carol@uni.edu").unwrap();

        db.insert_message(alice, bob, "hey, study group?").unwrap();
        db.insert_message(bob, alice, "sure, when?").unwrap();
        db.insert_message(alice, carol, "unrelated").unwrap();

        let chat = db.get_conversation(alice, bob).unwrap();
        assert_eq!(chat.len(), 2);
        assert_eq!(chat[0].content, "hey, study group?");
        assert_eq!(chat[1].content, "sure, when?");

        assert!(matches!(
            db.insert_message(alice, bob, "   "),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn friend_request_is_deduplicated() {
        let mut db = test_db();
        let alice = db.ensure_user("auth0|a", "Alice", "alice@uni.edu").unwrap();
        let bob = db.ensure_user("auth0|b", "Bob", "bob@uni.edu").unwrap();

        let first = db.request_friendship(alice, bob).unwrap();
        let second = db.request_friendship(alice, bob).unwrap();
        assert_eq!(first, second);

        db.set_friendship_status(first, "accepted").unwrap();
        let rows = db.get_user_friendships(bob).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "accepted");

        assert!(matches!(
            db.request_friendship(alice, alice),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn documents_are_listed_per_course() {
        let mut db = test_db();
        let user = db.ensure_user("auth0|abc", "Alice", "alice@uni.edu").unwrap();
        db.merge_courses(&[course("COMPSCI_300"), course("MATH_221")])
            .unwrap();
        let cs = db.get_course_by_code("COMPSCI_300").unwrap().id;
        let math = db.get_course_by_code("MATH_221").unwrap().id;

        db.insert_document(cs, user, "notes-week1.pdf").unwrap();
        db.insert_document(math, user, "problem-set.pdf").unwrap();

        let docs = db.get_course_documents(cs).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].filename, "notes-week1.pdf");
    }
}
