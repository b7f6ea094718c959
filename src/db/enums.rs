use crate::schema::sql_types;
use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::{AsExpression, FromSqlRow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::UserRole)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Superadmin,
    Admin,
    Researcher,
    Student,
    User,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Superadmin,
        UserRole::Admin,
        UserRole::Researcher,
        UserRole::Student,
        UserRole::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Superadmin => "superadmin",
            UserRole::Admin => "admin",
            UserRole::Researcher => "researcher",
            UserRole::Student => "student",
            UserRole::User => "user",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Superadmin)
    }

    /// Role picked at self-registration. Elevated roles are never granted here;
    /// `admin` comes only through the admin key check done by the caller.
    pub fn self_assignable(raw: Option<&str>) -> UserRole {
        match raw.map(|r| r.trim().to_lowercase()).as_deref() {
            Some("researcher") => UserRole::Researcher,
            Some("student") => UserRole::Student,
            _ => UserRole::User,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "superadmin" => Ok(UserRole::Superadmin),
            "admin" => Ok(UserRole::Admin),
            "researcher" => Ok(UserRole::Researcher),
            "student" => Ok(UserRole::Student),
            "user" => Ok(UserRole::User),
            other => Err(format!("Invalid role: {}", other)),
        }
    }
}

impl ToSql<sql_types::UserRole, Pg> for UserRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<sql_types::UserRole, Pg> for UserRole {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::TaskStatus)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Canceled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Canceled => "canceled",
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "canceled" => Ok(TaskStatus::Canceled),
            other => Err(format!("Invalid task status: {}", other)),
        }
    }
}

impl ToSql<sql_types::TaskStatus, Pg> for TaskStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<sql_types::TaskStatus, Pg> for TaskStatus {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::InvitationStatus)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Canceled,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
            InvitationStatus::Canceled => "canceled",
        }
    }

    /// Only a pending invitation can move, and only to a terminal state.
    pub fn can_transition_to(&self, next: InvitationStatus) -> bool {
        *self == InvitationStatus::Pending && next != InvitationStatus::Pending
    }
}

impl FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "declined" => Ok(InvitationStatus::Declined),
            "canceled" => Ok(InvitationStatus::Canceled),
            other => Err(format!("Invalid invitation status: {}", other)),
        }
    }
}

impl ToSql<sql_types::InvitationStatus, Pg> for InvitationStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<sql_types::InvitationStatus, Pg> for InvitationStatus {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsExpression, FromSqlRow)]
#[diesel(sql_type = sql_types::LibraryItemType)]
#[serde(rename_all = "lowercase")]
pub enum LibraryItemType {
    Link,
    Pdf,
}

impl LibraryItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LibraryItemType::Link => "link",
            LibraryItemType::Pdf => "pdf",
        }
    }
}

impl FromStr for LibraryItemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "link" => Ok(LibraryItemType::Link),
            "pdf" => Ok(LibraryItemType::Pdf),
            other => Err(format!("Invalid item type: {}", other)),
        }
    }
}

impl ToSql<sql_types::LibraryItemType, Pg> for LibraryItemType {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<sql_types::LibraryItemType, Pg> for LibraryItemType {
    fn from_sql(bytes: <Pg as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse().map_err(|e: String| e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_registration_never_elevates() {
        assert_eq!(UserRole::self_assignable(Some("Researcher")), UserRole::Researcher);
        assert_eq!(UserRole::self_assignable(Some("STUDENT")), UserRole::Student);
        assert_eq!(UserRole::self_assignable(Some("admin")), UserRole::User);
        assert_eq!(UserRole::self_assignable(Some("superadmin")), UserRole::User);
        assert_eq!(UserRole::self_assignable(Some("pirate")), UserRole::User);
        assert_eq!(UserRole::self_assignable(None), UserRole::User);
    }

    #[test]
    fn role_parsing_round_trips_names() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>(), Ok(role));
        }
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn task_status_rejects_unknown() {
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("done".parse::<TaskStatus>().is_err());
        assert!(TaskStatus::Pending.is_open());
        assert!(!TaskStatus::Canceled.is_open());
    }

    #[test]
    fn terminal_invitation_states_do_not_move() {
        use InvitationStatus::*;
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Canceled));
        assert!(!Pending.can_transition_to(Pending));
        for terminal in [Accepted, Declined, Canceled] {
            for next in [Pending, Accepted, Declined, Canceled] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }
}
