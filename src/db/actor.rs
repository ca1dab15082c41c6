use crate::db::models::{DbProject, DbUser};
use crate::db::patch::{
    ComponentCreateRow, ComponentStylePatch, DbPatchable, PatchedRecord, ProjectCreateRow,
    StorePatch, UserCreate, ValueCreate, ValuePatch,
};
use crate::db::queries::{
    bump_revision, fetch_value, list_components, list_values, load_resolved_style, validate_refs,
};
use crate::db::schema::{SQLITE_INIT, value_table};
use crate::error::SwatchError;
use chrono::Utc;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::{str::FromStr, time::Duration};
use swatchbook_schema::{
    Component, ComponentType, EntityId, Project, ProjectAggregate, ResolvedStyle, Revisioned, StyleSlot,
    UserView, Value, ValueKind,
};
use tracing::{debug, info};

type Reply<T> = RpcReplyPort<Result<T, SwatchError>>;

#[derive(Debug)]
pub enum DbActorMessage {
    /// Insert a user. Fails with `UserExists` on a duplicate email.
    CreateUser(UserCreate, Reply<UserView>),

    /// Look up a user (with password hash) by email.
    FindUserByEmail(String, Reply<Option<DbUser>>),

    GetUser(EntityId, Reply<Option<UserView>>),

    /// Projects owned by a user, oldest first.
    ListProjects(EntityId, Reply<Vec<Project>>),

    CreateProject(ProjectCreateRow, Reply<Project>),

    /// `(project_id, owner_user_id)`. `NotFound` unless the user owns the project.
    GetOwnedProject(EntityId, EntityId, Reply<Project>),

    /// Project with every value and resolved component.
    LoadAggregate(EntityId, Reply<ProjectAggregate>),

    ListValues(EntityId, ValueKind, Reply<Vec<Value>>),

    CreateValue(ValueCreate, Reply<Revisioned<Value>>),

    /// Insert a component and its style row after validating every reference.
    CreateComponent(ComponentCreateRow, Reply<Revisioned<Component>>),

    /// Patch a value or a component style.
    Patch(StorePatch, Reply<Revisioned<PatchedRecord>>),
}

#[derive(Clone)]
pub struct DbActorHandle {
    actor: ActorRef<DbActorMessage>,
}

impl DbActorHandle {
    pub async fn create_user(&self, create: UserCreate) -> Result<UserView, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::CreateUser, create)
            .map_err(|e| SwatchError::RactorError(format!("DbActor CreateUser RPC failed: {e}")))?
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<DbUser>, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::FindUserByEmail, email.to_string()).map_err(
            |e| SwatchError::RactorError(format!("DbActor FindUserByEmail RPC failed: {e}")),
        )?
    }

    pub async fn get_user(&self, id: EntityId) -> Result<Option<UserView>, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::GetUser, id)
            .map_err(|e| SwatchError::RactorError(format!("DbActor GetUser RPC failed: {e}")))?
    }

    pub async fn list_projects(&self, owner: EntityId) -> Result<Vec<Project>, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::ListProjects, owner).map_err(|e| {
            SwatchError::RactorError(format!("DbActor ListProjects RPC failed: {e}"))
        })?
    }

    pub async fn create_project(&self, create: ProjectCreateRow) -> Result<Project, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::CreateProject, create).map_err(|e| {
            SwatchError::RactorError(format!("DbActor CreateProject RPC failed: {e}"))
        })?
    }

    pub async fn get_owned_project(
        &self,
        project_id: EntityId,
        owner: EntityId,
    ) -> Result<Project, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::GetOwnedProject, project_id, owner)
            .map_err(|e| SwatchError::RactorError(format!("DbActor GetOwnedProject RPC failed: {e}")))?
    }

    pub async fn load_aggregate(&self, project_id: EntityId) -> Result<ProjectAggregate, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::LoadAggregate, project_id).map_err(|e| {
            SwatchError::RactorError(format!("DbActor LoadAggregate RPC failed: {e}"))
        })?
    }

    pub async fn list_values(
        &self,
        project_id: EntityId,
        kind: ValueKind,
    ) -> Result<Vec<Value>, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::ListValues, project_id, kind)
            .map_err(|e| SwatchError::RactorError(format!("DbActor ListValues RPC failed: {e}")))?
    }

    pub async fn create_value(&self, create: ValueCreate) -> Result<Revisioned<Value>, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::CreateValue, create).map_err(|e| {
            SwatchError::RactorError(format!("DbActor CreateValue RPC failed: {e}"))
        })?
    }

    pub async fn create_component(
        &self,
        create: ComponentCreateRow,
    ) -> Result<Revisioned<Component>, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::CreateComponent, create).map_err(|e| {
            SwatchError::RactorError(format!("DbActor CreateComponent RPC failed: {e}"))
        })?
    }

    pub async fn patch(&self, patch: StorePatch) -> Result<Revisioned<PatchedRecord>, SwatchError> {
        ractor::call!(self.actor, DbActorMessage::Patch, patch)
            .map_err(|e| SwatchError::RactorError(format!("DbActor Patch RPC failed: {e}")))?
    }

    pub async fn patch_value(
        &self,
        project_id: EntityId,
        kind: ValueKind,
        id: EntityId,
        patch: ValuePatch,
    ) -> Result<Revisioned<Value>, SwatchError> {
        let patched = self
            .patch(StorePatch::Value {
                project_id,
                kind,
                id,
                patch,
            })
            .await?;
        match patched.record {
            PatchedRecord::Value(value) => Ok(Revisioned::new(patched.revision, value)),
            PatchedRecord::Style(_) => Err(SwatchError::UnexpectedError(
                "value patch returned a style record".to_string(),
            )),
        }
    }

    pub async fn patch_component_style(
        &self,
        project_id: EntityId,
        component_type: ComponentType,
        component_id: EntityId,
        patch: ComponentStylePatch,
    ) -> Result<Revisioned<ResolvedStyle>, SwatchError> {
        let patched = self
            .patch(StorePatch::ComponentStyle {
                project_id,
                component_type,
                component_id,
                patch,
            })
            .await?;
        match patched.record {
            PatchedRecord::Style(styles) => Ok(Revisioned::new(patched.revision, styles)),
            PatchedRecord::Value(_) => Err(SwatchError::UnexpectedError(
                "style patch returned a value record".to_string(),
            )),
        }
    }
}

struct DbActorState {
    pool: SqlitePool,
}

struct DbActor;

#[ractor::async_trait]
impl Actor for DbActor {
    type Msg = DbActorMessage;
    type State = DbActorState;
    type Arguments = String;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        database_url: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let connect_opts = SqliteConnectOptions::from_str(database_url.as_str())
            .map_err(|e| ActorProcessingErr::from(format!("invalid database url: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .connect_with(connect_opts)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db connect failed: {e}")))?;

        apply_schema(&pool)
            .await
            .map_err(|e| ActorProcessingErr::from(format!("db schema init failed: {e}")))?;

        info!("DbActor initialized");
        Ok(DbActorState { pool })
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let pool = &state.pool;
        match message {
            DbActorMessage::CreateUser(create, reply) => {
                let _ = reply.send(self.create_user(pool, create).await);
            }
            DbActorMessage::FindUserByEmail(email, reply) => {
                let _ = reply.send(self.find_user_by_email(pool, &email).await);
            }
            DbActorMessage::GetUser(id, reply) => {
                let _ = reply.send(self.get_user(pool, id).await);
            }
            DbActorMessage::ListProjects(owner, reply) => {
                let _ = reply.send(self.list_projects(pool, owner).await);
            }
            DbActorMessage::CreateProject(create, reply) => {
                let _ = reply.send(self.create_project(pool, create).await);
            }
            DbActorMessage::GetOwnedProject(project_id, owner, reply) => {
                let _ = reply.send(self.get_owned_project(pool, project_id, owner).await);
            }
            DbActorMessage::LoadAggregate(project_id, reply) => {
                let _ = reply.send(self.load_aggregate(pool, project_id).await);
            }
            DbActorMessage::ListValues(project_id, kind, reply) => {
                let _ = reply.send(self.list_values(pool, project_id, kind).await);
            }
            DbActorMessage::CreateValue(create, reply) => {
                let _ = reply.send(self.create_value(pool, create).await);
            }
            DbActorMessage::CreateComponent(create, reply) => {
                let _ = reply.send(self.create_component(pool, create).await);
            }
            DbActorMessage::Patch(patch, reply) => {
                let res = patch.apply_patch(pool).await;
                let _ = reply.send(res);
            }
        }
        Ok(())
    }
}

impl DbActor {
    async fn create_user(
        &self,
        pool: &SqlitePool,
        create: UserCreate,
    ) -> Result<UserView, SwatchError> {
        let now = Utc::now();
        let res = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO user (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(create.username)
        .bind(create.email)
        .bind(create.password_hash)
        .bind(now)
        .fetch_one(pool)
        .await;

        match res {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(SwatchError::UserExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_user_by_email(
        &self,
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<DbUser>, SwatchError> {
        let row = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, email, password_hash, created_at FROM user WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    async fn get_user(
        &self,
        pool: &SqlitePool,
        id: EntityId,
    ) -> Result<Option<UserView>, SwatchError> {
        let row = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, email, password_hash, created_at FROM user WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(UserView::from))
    }

    async fn list_projects(
        &self,
        pool: &SqlitePool,
        owner: EntityId,
    ) -> Result<Vec<Project>, SwatchError> {
        let rows = sqlx::query_as::<_, DbProject>(
            r#"
            SELECT id, name, owner_user_id, revision, created_at, updated_at
            FROM project
            WHERE owner_user_id = ?
            ORDER BY id
            "#,
        )
        .bind(owner)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn create_project(
        &self,
        pool: &SqlitePool,
        create: ProjectCreateRow,
    ) -> Result<Project, SwatchError> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, DbProject>(
            r#"
            INSERT INTO project (name, owner_user_id, revision, created_at, updated_at)
            VALUES (?, ?, 0, ?, ?)
            RETURNING id, name, owner_user_id, revision, created_at, updated_at
            "#,
        )
        .bind(create.name)
        .bind(create.owner_user_id)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;
        debug!(project_id = row.id, owner = row.owner_user_id, "project created");
        Ok(row.into())
    }

    async fn get_owned_project(
        &self,
        pool: &SqlitePool,
        project_id: EntityId,
        owner: EntityId,
    ) -> Result<Project, SwatchError> {
        let row = sqlx::query_as::<_, DbProject>(
            r#"
            SELECT id, name, owner_user_id, revision, created_at, updated_at
            FROM project
            WHERE id = ? AND owner_user_id = ?
            "#,
        )
        .bind(project_id)
        .bind(owner)
        .fetch_optional(pool)
        .await?;
        row.map(Project::from)
            .ok_or_else(|| SwatchError::NotFound(format!("project {project_id}")))
    }

    async fn load_aggregate(
        &self,
        pool: &SqlitePool,
        project_id: EntityId,
    ) -> Result<ProjectAggregate, SwatchError> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, DbProject>(
            r#"
            SELECT id, name, owner_user_id, revision, created_at, updated_at
            FROM project
            WHERE id = ?
            "#,
        )
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| SwatchError::NotFound(format!("project {project_id}")))?;

        let colors = list_values(&mut tx, ValueKind::Color, project_id).await?;
        let radii = list_values(&mut tx, ValueKind::Radius, project_id).await?;
        let spacings = list_values(&mut tx, ValueKind::Spacing, project_id).await?;
        let components = list_components(&mut tx, project_id, &colors, &radii, &spacings).await?;
        tx.commit().await?;

        Ok(ProjectAggregate {
            id: project.id,
            name: project.name,
            revision: project.revision,
            colors,
            radii,
            spacings,
            components,
        })
    }

    async fn list_values(
        &self,
        pool: &SqlitePool,
        project_id: EntityId,
        kind: ValueKind,
    ) -> Result<Vec<Value>, SwatchError> {
        let mut conn = pool.acquire().await?;
        list_values(&mut conn, kind, project_id).await
    }

    async fn create_value(
        &self,
        pool: &SqlitePool,
        create: ValueCreate,
    ) -> Result<Revisioned<Value>, SwatchError> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        let sql = format!(
            r#"
            INSERT INTO {} (label, value, project_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
            value_table(create.kind)
        );
        let id: EntityId = sqlx::query_scalar(&sql)
            .bind(&create.label)
            .bind(&create.value)
            .bind(create.project_id)
            .bind(now)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

        let value = fetch_value(&mut tx, create.kind, id).await?.ok_or_else(|| {
            SwatchError::UnexpectedError(format!("{} {id} vanished after insert", create.kind))
        })?;
        let revision = bump_revision(&mut tx, create.project_id).await?;
        tx.commit().await?;

        debug!(kind = %create.kind, project_id = create.project_id, id, revision, "value created");
        Ok(Revisioned::new(revision, value))
    }

    async fn create_component(
        &self,
        pool: &SqlitePool,
        create: ComponentCreateRow,
    ) -> Result<Revisioned<Component>, SwatchError> {
        let now = Utc::now();
        let mut tx = pool.begin().await?;

        validate_refs(&mut tx, create.project_id, &create.styles).await?;

        let id: EntityId = sqlx::query_scalar(
            r#"
            INSERT INTO component (type, variant, project_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(create.component_type.as_str())
        .bind(&create.variant)
        .bind(create.project_id)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let refs = &create.styles;
        sqlx::query(
            r#"
            INSERT INTO component_style (
                component_id, background_color_id, text_color_id, border_color_id,
                border_radius_id, padding_x_id, padding_y_id
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(refs.get(StyleSlot::BackgroundColor))
        .bind(refs.get(StyleSlot::TextColor))
        .bind(refs.get(StyleSlot::BorderColor))
        .bind(refs.get(StyleSlot::BorderRadius))
        .bind(refs.get(StyleSlot::PaddingX))
        .bind(refs.get(StyleSlot::PaddingY))
        .execute(&mut *tx)
        .await?;

        let styles = load_resolved_style(&mut tx, id).await?;
        let revision = bump_revision(&mut tx, create.project_id).await?;
        tx.commit().await?;

        debug!(
            component_type = %create.component_type,
            project_id = create.project_id,
            id,
            revision,
            "component created"
        );
        Ok(Revisioned::new(
            revision,
            Component {
                id,
                component_type: create.component_type,
                variant: create.variant,
                project_id: create.project_id,
                styles,
            },
        ))
    }
}

/// Spawn the database actor and return a cloneable handle.
pub async fn spawn(database_url: &str) -> DbActorHandle {
    let (actor, _jh) = ractor::Actor::spawn(None, DbActor, database_url.to_string())
        .await
        .expect("failed to spawn DbActor");

    DbActorHandle { actor }
}

async fn apply_schema(pool: &SqlitePool) -> Result<(), SwatchError> {
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}
