//! SQL DDL for initializing the database schema.
//! SQLite-first design; can be adapted for other RDBMS.

use swatchbook_schema::ValueKind;

/// SQLite schema includes:
/// - `user` table (credentials, one email per row)
/// - `project` table (owned by a user, carries the write `revision`)
/// - `color` / `radius` / `spacing` value tables (scoped by project)
/// - `component` table plus its 1:1 `component_style` row of value references
pub const SQLITE_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- Users and projects
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS user (
    id INTEGER PRIMARY KEY NOT NULL,
    username TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL -- RFC3339
);

CREATE TABLE IF NOT EXISTS project (
    id INTEGER PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    owner_user_id INTEGER NOT NULL REFERENCES user(id),
    revision INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_project_owner ON project(owner_user_id);

-- ---------------------------------------------------------------------------
-- Design values (one table per kind)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS color (
    id INTEGER PRIMARY KEY NOT NULL,
    label TEXT NOT NULL,
    value TEXT NOT NULL,
    project_id INTEGER NOT NULL REFERENCES project(id),
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_color_project ON color(project_id);

CREATE TABLE IF NOT EXISTS radius (
    id INTEGER PRIMARY KEY NOT NULL,
    label TEXT NOT NULL,
    value TEXT NOT NULL,
    project_id INTEGER NOT NULL REFERENCES project(id),
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_radius_project ON radius(project_id);

CREATE TABLE IF NOT EXISTS spacing (
    id INTEGER PRIMARY KEY NOT NULL,
    label TEXT NOT NULL,
    value TEXT NOT NULL,
    project_id INTEGER NOT NULL REFERENCES project(id),
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_spacing_project ON spacing(project_id);

-- ---------------------------------------------------------------------------
-- Components and their style references
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS component (
    id INTEGER PRIMARY KEY NOT NULL,
    type TEXT NOT NULL,
    variant TEXT NOT NULL,
    project_id INTEGER NOT NULL REFERENCES project(id),
    created_at TEXT NOT NULL, -- RFC3339
    updated_at TEXT NOT NULL -- RFC3339
);

CREATE INDEX IF NOT EXISTS idx_component_project ON component(project_id, type);

CREATE TABLE IF NOT EXISTS component_style (
    component_id INTEGER PRIMARY KEY NOT NULL REFERENCES component(id),
    background_color_id INTEGER NOT NULL REFERENCES color(id),
    text_color_id INTEGER NOT NULL REFERENCES color(id),
    border_color_id INTEGER NOT NULL REFERENCES color(id),
    border_radius_id INTEGER NOT NULL REFERENCES radius(id),
    padding_x_id INTEGER NOT NULL REFERENCES spacing(id),
    padding_y_id INTEGER NOT NULL REFERENCES spacing(id)
);
"#;

/// Table holding values of `kind`.
pub fn value_table(kind: ValueKind) -> &'static str {
    match kind {
        ValueKind::Color => "color",
        ValueKind::Radius => "radius",
        ValueKind::Spacing => "spacing",
    }
}
