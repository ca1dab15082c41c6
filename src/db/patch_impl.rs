//! StorePatch -> DbPatchable implementation.
//!
//! This sits in the `db` module because it contains SQL/table knowledge.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use swatchbook_schema::{Revisioned, StyleSlot};
use tracing::debug;

use crate::db::patch::{
    ComponentStylePatch, DbPatchable, PatchedRecord, StorePatch, ValuePatch,
};
use crate::db::queries::{bump_revision, fetch_value, load_resolved_style, validate_ref};
use crate::db::schema::value_table;
use crate::error::SwatchError;

#[async_trait]
impl DbPatchable for StorePatch {
    async fn apply_patch(
        &self,
        pool: &SqlitePool,
    ) -> Result<Revisioned<PatchedRecord>, SwatchError> {
        match self {
            StorePatch::Value {
                project_id,
                kind,
                id,
                patch,
            } => {
                let ValuePatch { label, value } = patch.clone();

                let label_set = label.is_some();
                let value_set = value.is_some();
                let updated_at = Utc::now();

                let mut tx = pool.begin().await?;

                // Table name comes from a closed enum, never from input.
                let sql = format!(
                    r#"
                    UPDATE {}
                    SET
                        label = COALESCE(?, label),
                        value = COALESCE(?, value),
                        updated_at = ?
                    WHERE id = ? AND project_id = ?
                    "#,
                    value_table(*kind)
                );
                let res = sqlx::query(&sql)
                    .bind(label)
                    .bind(value)
                    .bind(updated_at)
                    .bind(id)
                    .bind(project_id)
                    .execute(&mut *tx)
                    .await?;

                let affected = res.rows_affected();
                debug!(
                    kind = %kind,
                    project_id,
                    id,
                    affected,
                    updated_at = %updated_at,
                    label_set,
                    value_set,
                    "db patch applied"
                );

                if affected == 0 {
                    return Err(SwatchError::NotFound(format!(
                        "{kind} {id} in project {project_id}"
                    )));
                }

                let record = fetch_value(&mut tx, *kind, *id).await?.ok_or_else(|| {
                    SwatchError::UnexpectedError(format!("{kind} {id} vanished after update"))
                })?;
                let revision = bump_revision(&mut tx, *project_id).await?;
                tx.commit().await?;

                Ok(Revisioned::new(revision, PatchedRecord::Value(record)))
            }

            StorePatch::ComponentStyle {
                project_id,
                component_type,
                component_id,
                patch,
            } => {
                let mut tx = pool.begin().await?;

                let owned: Option<i64> = sqlx::query_scalar(
                    "SELECT id FROM component WHERE id = ? AND project_id = ? AND type = ?",
                )
                .bind(component_id)
                .bind(project_id)
                .bind(component_type.as_str())
                .fetch_optional(&mut *tx)
                .await?;
                if owned.is_none() {
                    return Err(SwatchError::NotFound(format!(
                        "{component_type} {component_id} in project {project_id}"
                    )));
                }

                for slot in StyleSlot::ALL {
                    if let Some(id) = patch.get(slot) {
                        validate_ref(&mut tx, *project_id, slot, id).await?;
                    }
                }

                let ComponentStylePatch {
                    background_color,
                    text_color,
                    border_color,
                    border_radius,
                    padding_x,
                    padding_y,
                } = patch.clone();
                let updated_at = Utc::now();

                let res = sqlx::query(
                    r#"
                    UPDATE component_style
                    SET
                        background_color_id = COALESCE(?, background_color_id),
                        text_color_id = COALESCE(?, text_color_id),
                        border_color_id = COALESCE(?, border_color_id),
                        border_radius_id = COALESCE(?, border_radius_id),
                        padding_x_id = COALESCE(?, padding_x_id),
                        padding_y_id = COALESCE(?, padding_y_id)
                    WHERE component_id = ?
                    "#,
                )
                .bind(background_color)
                .bind(text_color)
                .bind(border_color)
                .bind(border_radius)
                .bind(padding_x)
                .bind(padding_y)
                .bind(component_id)
                .execute(&mut *tx)
                .await?;

                let affected = res.rows_affected();
                debug!(
                    project_id,
                    component_type = %component_type,
                    component_id,
                    affected,
                    updated_at = %updated_at,
                    "db style patch applied"
                );

                if affected == 0 {
                    return Err(SwatchError::NotFound(format!(
                        "style row for component {component_id}"
                    )));
                }

                sqlx::query("UPDATE component SET updated_at = ? WHERE id = ?")
                    .bind(updated_at)
                    .bind(component_id)
                    .execute(&mut *tx)
                    .await?;

                let styles = load_resolved_style(&mut tx, *component_id).await?;
                let revision = bump_revision(&mut tx, *project_id).await?;
                tx.commit().await?;

                Ok(Revisioned::new(revision, PatchedRecord::Style(styles)))
            }
        }
    }
}
