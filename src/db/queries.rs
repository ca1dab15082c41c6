//! SQL helpers shared by the actor and the patch implementation.
//!
//! All helpers take a bare connection so they run inside the caller's transaction.

use ahash::AHashMap;
use chrono::Utc;
use sqlx::SqliteConnection;
use swatchbook_schema::{
    Component, ComponentType, EntityId, ResolvedStyle, Revision, StyleRefs, StyleSlot, Value,
    ValueKind,
};

use crate::db::models::{DbComponentRow, DbValue};
use crate::db::schema::value_table;
use crate::error::SwatchError;

pub(crate) async fn fetch_value(
    conn: &mut SqliteConnection,
    kind: ValueKind,
    id: EntityId,
) -> Result<Option<Value>, SwatchError> {
    let sql = format!(
        "SELECT id, label, value, project_id, created_at, updated_at FROM {} WHERE id = ?",
        value_table(kind)
    );
    let row = sqlx::query_as::<_, DbValue>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row.map(Value::from))
}

pub(crate) async fn list_values(
    conn: &mut SqliteConnection,
    kind: ValueKind,
    project_id: EntityId,
) -> Result<Vec<Value>, SwatchError> {
    let sql = format!(
        "SELECT id, label, value, project_id, created_at, updated_at FROM {} WHERE project_id = ? ORDER BY id",
        value_table(kind)
    );
    let rows = sqlx::query_as::<_, DbValue>(&sql)
        .bind(project_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows.into_iter().map(Value::from).collect())
}

/// Rejects any slot whose id is not a value of the slot's kind in `project_id`.
pub(crate) async fn validate_ref(
    conn: &mut SqliteConnection,
    project_id: EntityId,
    slot: StyleSlot,
    id: EntityId,
) -> Result<(), SwatchError> {
    let sql = format!(
        "SELECT id FROM {} WHERE id = ? AND project_id = ?",
        value_table(slot.kind())
    );
    let found: Option<i64> = sqlx::query_scalar(&sql)
        .bind(id)
        .bind(project_id)
        .fetch_optional(&mut *conn)
        .await?;
    match found {
        Some(_) => Ok(()),
        None => Err(SwatchError::InvalidReference { slot, id }),
    }
}

pub(crate) async fn validate_refs(
    conn: &mut SqliteConnection,
    project_id: EntityId,
    refs: &StyleRefs,
) -> Result<(), SwatchError> {
    for slot in StyleSlot::ALL {
        validate_ref(conn, project_id, slot, refs.get(slot)).await?;
    }
    Ok(())
}

pub(crate) async fn load_resolved_style(
    conn: &mut SqliteConnection,
    component_id: EntityId,
) -> Result<ResolvedStyle, SwatchError> {
    let row = sqlx::query_as::<_, DbComponentRow>(
        r#"
        SELECT c.id, c.type, c.variant, c.project_id,
               s.background_color_id, s.text_color_id, s.border_color_id,
               s.border_radius_id, s.padding_x_id, s.padding_y_id
        FROM component c
        JOIN component_style s ON s.component_id = c.id
        WHERE c.id = ?
        "#,
    )
    .bind(component_id)
    .fetch_optional(&mut *conn)
    .await?
    .ok_or_else(|| SwatchError::NotFound(format!("component {component_id}")))?;

    let refs = row.refs();
    Ok(ResolvedStyle {
        component_id,
        background_color: resolve_slot(conn, component_id, StyleSlot::BackgroundColor, &refs)
            .await?,
        text_color: resolve_slot(conn, component_id, StyleSlot::TextColor, &refs).await?,
        border_color: resolve_slot(conn, component_id, StyleSlot::BorderColor, &refs).await?,
        border_radius: resolve_slot(conn, component_id, StyleSlot::BorderRadius, &refs).await?,
        padding_x: resolve_slot(conn, component_id, StyleSlot::PaddingX, &refs).await?,
        padding_y: resolve_slot(conn, component_id, StyleSlot::PaddingY, &refs).await?,
    })
}

async fn resolve_slot(
    conn: &mut SqliteConnection,
    component_id: EntityId,
    slot: StyleSlot,
    refs: &StyleRefs,
) -> Result<Value, SwatchError> {
    let id = refs.get(slot);
    fetch_value(conn, slot.kind(), id).await?.ok_or_else(|| {
        SwatchError::UnexpectedError(format!(
            "component {component_id} {slot} references missing value {id}"
        ))
    })
}

/// Loads every component of a project with styles resolved from in-memory value maps.
pub(crate) async fn list_components(
    conn: &mut SqliteConnection,
    project_id: EntityId,
    colors: &[Value],
    radii: &[Value],
    spacings: &[Value],
) -> Result<Vec<Component>, SwatchError> {
    let rows = sqlx::query_as::<_, DbComponentRow>(
        r#"
        SELECT c.id, c.type, c.variant, c.project_id,
               s.background_color_id, s.text_color_id, s.border_color_id,
               s.border_radius_id, s.padding_x_id, s.padding_y_id
        FROM component c
        JOIN component_style s ON s.component_id = c.id
        WHERE c.project_id = ?
        ORDER BY c.id
        "#,
    )
    .bind(project_id)
    .fetch_all(&mut *conn)
    .await?;

    let index = |values: &[Value]| -> AHashMap<EntityId, Value> {
        values.iter().map(|v| (v.id, v.clone())).collect()
    };
    let colors = index(colors);
    let radii = index(radii);
    let spacings = index(spacings);

    rows.into_iter()
        .map(|row| {
            let refs = row.refs();
            let resolve = |slot: StyleSlot| -> Result<Value, SwatchError> {
                let map = match slot.kind() {
                    ValueKind::Color => &colors,
                    ValueKind::Radius => &radii,
                    ValueKind::Spacing => &spacings,
                };
                let id = refs.get(slot);
                map.get(&id).cloned().ok_or_else(|| {
                    SwatchError::UnexpectedError(format!(
                        "component {} {slot} references missing value {id}",
                        row.id
                    ))
                })
            };
            let component_type = row
                .component_type
                .parse::<ComponentType>()
                .map_err(SwatchError::UnexpectedError)?;
            Ok(Component {
                id: row.id,
                component_type,
                variant: row.variant.clone(),
                project_id: row.project_id,
                styles: ResolvedStyle {
                    component_id: row.id,
                    background_color: resolve(StyleSlot::BackgroundColor)?,
                    text_color: resolve(StyleSlot::TextColor)?,
                    border_color: resolve(StyleSlot::BorderColor)?,
                    border_radius: resolve(StyleSlot::BorderRadius)?,
                    padding_x: resolve(StyleSlot::PaddingX)?,
                    padding_y: resolve(StyleSlot::PaddingY)?,
                },
            })
        })
        .collect()
}

/// Bumps the project's write counter and returns the new value.
pub(crate) async fn bump_revision(
    conn: &mut SqliteConnection,
    project_id: EntityId,
) -> Result<Revision, SwatchError> {
    let revision: Option<Revision> = sqlx::query_scalar(
        "UPDATE project SET revision = revision + 1, updated_at = ? WHERE id = ? RETURNING revision",
    )
    .bind(Utc::now())
    .bind(project_id)
    .fetch_optional(&mut *conn)
    .await?;

    revision.ok_or_else(|| SwatchError::NotFound(format!("project {project_id}")))
}
