//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::{PageParams, Paginated};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Email, Role, StoredCredentials, User, UserId, UserName};

use super::error_mapping::DbFailure;
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map failures of a write that carries `user`'s email and role.
fn map_write_failure(user: &User) -> impl FnOnce(diesel::result::Error) -> UserPersistenceError {
    let email = user.email.to_string();
    let role_id = user.role.id();
    move |error| match DbFailure::from(error) {
        DbFailure::UniqueViolation(_) => UserPersistenceError::duplicate_email(email),
        DbFailure::ForeignKeyViolation(_) => UserPersistenceError::unknown_role(role_id),
        other => map_failure(other),
    }
}

fn map_failure(failure: impl Into<DbFailure>) -> UserPersistenceError {
    match failure.into() {
        DbFailure::Connection(message) => UserPersistenceError::connection(message),
        DbFailure::ForeignKeyViolation(message) => UserPersistenceError::in_use(message),
        DbFailure::UniqueViolation(message) | DbFailure::Query(message) => {
            UserPersistenceError::query(message)
        }
    }
}

fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserPersistenceError> {
    let UserRow {
        id,
        name,
        email,
        password_hash,
        role_id,
        created_at,
        updated_at,
    } = row;
    let invalid = |err: crate::domain::UserValidationError| {
        UserPersistenceError::query(format!("stored user {id} is invalid: {err}"))
    };
    let role = Role::from_id(role_id)
        .ok_or_else(|| UserPersistenceError::query(format!("stored role {role_id} is unknown")))?;
    Ok(StoredCredentials {
        user: User {
            id: UserId::from(id),
            name: UserName::new(name).map_err(invalid)?,
            email: Email::new(email).map_err(invalid)?,
            role,
            created_at,
            updated_at,
        },
        password_hash,
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row_to_credentials(row).map(|stored| stored.user)
}

/// Column a single-row lookup keys on.
enum Lookup<'a> {
    Id(&'a UserId),
    Email(&'a Email),
}

impl DieselUserRepository {
    async fn find_row(&self, lookup: Lookup<'_>) -> Result<Option<UserRow>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let query = users::table.select(UserRow::as_select()).into_boxed();
        let query = match lookup {
            Lookup::Id(id) => query.filter(users::id.eq(*id.as_uuid())),
            Lookup::Email(email) => query.filter(users::email.eq(email.as_ref().to_owned())),
        };
        query
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_failure)
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User, password_hash: &str) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password_hash,
            role_id: user.role.id(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_write_failure(user))
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let changes = UserUpdate {
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            role_id: user.role.id(),
            updated_at: user.updated_at,
        };
        diesel::update(users::table.find(*user.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_write_failure(user))
    }

    async fn set_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        diesel::update(users::table.find(*id.as_uuid()))
            .set((
                users::password_hash.eq(password_hash),
                users::updated_at.eq(updated_at),
            ))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_failure)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map(|affected| affected > 0)
            .map_err(map_failure)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        self.find_row(Lookup::Id(id))
            .await?
            .map(row_to_user)
            .transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        self.find_row(Lookup::Email(email))
            .await?
            .map(row_to_credentials)
            .transpose()
    }

    async fn find_credentials_by_id(
        &self,
        id: &UserId,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        self.find_row(Lookup::Id(id))
            .await?
            .map(row_to_credentials)
            .transpose()
    }

    async fn list(&self, page: PageParams) -> Result<Paginated<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_failure)?;
        let total: i64 = users::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_failure)?;
        let offset = i64::try_from(page.offset())
            .map_err(|_| UserPersistenceError::query("offset out of range"))?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order((users::name.asc(), users::id.asc()))
            .limit(i64::from(page.limit()))
            .offset(offset)
            .load(&mut conn)
            .await
            .map_err(map_failure)?;
        let items = rows
            .into_iter()
            .map(row_to_user)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Paginated::new(
            items,
            page,
            u64::try_from(total).unwrap_or_default(),
        ))
    }
}
