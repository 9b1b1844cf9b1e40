use chrono::NaiveDateTime;
use diesel::prelude::*;

pub type Id = i32;

#[derive(Queryable, Selectable, PartialEq, Clone, Debug)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: Id,
    pub subject_id: String,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub availability: Option<String>,
    pub links: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Queryable, Selectable, PartialEq, Clone, Debug)]
#[diesel(table_name = crate::schema::courses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Course {
    pub id: Id,
    pub course_code: String,
    pub title: String,
    pub description: String,
    pub subjects: String,
    pub prerequisites: String,
    pub external_ref: Option<String>,
}

#[derive(Queryable, Selectable, PartialEq, Clone, Debug)]
#[diesel(table_name = crate::schema::enrollments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Enrollment {
    pub user_id: Id,
    pub course_id: Id,
    pub status: String,
    pub term: String,
}

#[derive(Queryable, Selectable, PartialEq, Clone, Debug)]
#[diesel(table_name = crate::schema::questions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Question {
    pub id: Id,
    pub course_id: Id,
    pub user_id: Id,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, PartialEq, Clone, Debug)]
#[diesel(table_name = crate::schema::answers)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Answer {
    pub id: Id,
    pub question_id: Id,
    pub user_id: Id,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, PartialEq, Clone, Debug)]
#[diesel(table_name = crate::schema::documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Document {
    pub id: Id,
    pub course_id: Id,
    pub user_id: Id,
    pub filename: String,
    pub created_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, PartialEq, Clone, Debug)]
#[diesel(table_name = crate::schema::messages)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DirectMessage {
    pub id: Id,
    pub sender_id: Id,
    pub recipient_id: Id,
    pub content: String,
    pub sent_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, PartialEq, Clone, Debug)]
#[diesel(table_name = crate::schema::friendships)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Friendship {
    pub id: Id,
    pub requester_id: Id,
    pub requested_id: Id,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub subject_id: &'a str,
    pub username: &'a str,
    pub email: &'a str,
}

#[derive(Insertable, Clone, Debug)]
#[diesel(table_name = crate::schema::courses)]
pub struct NewCourse {
    pub course_code: String,
    pub title: String,
    pub description: String,
    pub subjects: String,
    pub prerequisites: String,
    pub external_ref: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::enrollments)]
pub struct NewEnrollment<'a> {
    pub user_id: Id,
    pub course_id: Id,
    pub status: &'a str,
    pub term: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::questions)]
pub struct NewQuestion<'a> {
    pub course_id: Id,
    pub user_id: Id,
    pub title: &'a str,
    pub content: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::answers)]
pub struct NewAnswer<'a> {
    pub question_id: Id,
    pub user_id: Id,
    pub content: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::documents)]
pub struct NewDocument<'a> {
    pub course_id: Id,
    pub user_id: Id,
    pub filename: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::messages)]
pub struct NewMessage<'a> {
    pub sender_id: Id,
    pub recipient_id: Id,
    pub content: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::friendships)]
pub struct NewFriendship {
    pub requester_id: Id,
    pub requested_id: Id,
}

/// Profile fields a user may edit after first login. `None` leaves the
/// stored value untouched.
#[derive(AsChangeset, Default, Debug)]
#[diesel(table_name = crate::schema::users)]
pub struct ProfileUpdate<'a> {
    pub username: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub availability: Option<&'a str>,
    pub links: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
}
