//! Renders [`crate::schema::TABLES`] into `CREATE TABLE` statements for a
//! chosen [`Dialect`] (§6.2's `sc schema <dialect>` subcommand). This is a
//! text-generation layer only: [`crate::engine`] never calls into it, since
//! the engine only ever opens SQLite connections (§4.2).

use crate::dialect::Dialect;
use crate::schema::{ColumnSchema, ColumnType, TableSchema, TABLES};

fn column_type_sql(dialect: Dialect, ty: ColumnType) -> &'static str {
    use ColumnType::*;
    use Dialect::*;
    match (dialect, ty) {
        (Postgresql, Text) => "TEXT",
        (Postgresql, Integer) => "BIGINT",
        (Postgresql, Real) => "DOUBLE PRECISION",
        (Postgresql, Bool) => "BOOLEAN",
        (Postgresql, Json) => "JSONB",
        (Postgresql, Timestamp) => "TIMESTAMPTZ",

        (Mysql, Text) => "TEXT",
        (Mysql, Integer) => "BIGINT",
        (Mysql, Real) => "DOUBLE",
        (Mysql, Bool) => "BOOLEAN",
        (Mysql, Json) => "JSON",
        (Mysql, Timestamp) => "DATETIME",

        (Sqlite, Text) => "TEXT",
        (Sqlite, Integer) => "INTEGER",
        (Sqlite, Real) => "REAL",
        (Sqlite, Bool) => "INTEGER",
        (Sqlite, Json) => "TEXT",
        (Sqlite, Timestamp) => "TEXT",

        (Oracle, Text) => "VARCHAR2(4000)",
        (Oracle, Integer) => "NUMBER(19)",
        (Oracle, Real) => "BINARY_DOUBLE",
        (Oracle, Bool) => "NUMBER(1)",
        (Oracle, Json) => "CLOB",
        (Oracle, Timestamp) => "TIMESTAMP WITH TIME ZONE",

        (SqlServer, Text) => "NVARCHAR(MAX)",
        (SqlServer, Integer) => "BIGINT",
        (SqlServer, Real) => "FLOAT",
        (SqlServer, Bool) => "BIT",
        (SqlServer, Json) => "NVARCHAR(MAX)",
        (SqlServer, Timestamp) => "DATETIMEOFFSET",
    }
}

fn quote_ident(dialect: Dialect, ident: &str) -> String {
    match dialect {
        Dialect::Mysql => format!("`{ident}`"),
        Dialect::SqlServer => format!("[{ident}]"),
        _ => format!("\"{ident}\""),
    }
}

fn column_def(dialect: Dialect, column: &ColumnSchema) -> String {
    let name = quote_ident(dialect, column.name);
    let ty = column_type_sql(dialect, column.ty);
    let null = if column.nullable { "" } else { " NOT NULL" };
    format!("    {name} {ty}{null}")
}

fn create_table_sql(dialect: Dialect, table: &TableSchema, name: &str, columns: &[ColumnSchema], primary_key: &[&str]) -> String {
    let mut lines: Vec<String> = columns.iter().map(|c| column_def(dialect, c)).collect();

    let pk_cols = primary_key.iter().map(|c| quote_ident(dialect, c)).collect::<Vec<_>>().join(", ");
    lines.push(format!("    CONSTRAINT {} PRIMARY KEY ({pk_cols})", quote_ident(dialect, &format!("pk_{name}"))));

    if name == table.name {
        for fk in table.foreign_keys {
            let cols = fk.columns.iter().map(|c| quote_ident(dialect, c)).collect::<Vec<_>>().join(", ");
            let ref_cols = fk.referenced_columns.iter().map(|c| quote_ident(dialect, c)).collect::<Vec<_>>().join(", ");
            lines.push(format!(
                "    CONSTRAINT {} FOREIGN KEY ({cols}) REFERENCES {} ({ref_cols})",
                quote_ident(dialect, fk.name),
                quote_ident(dialect, fk.referenced_table),
            ));
        }
    }

    let body = lines.join(",\n");
    format!("CREATE TABLE {} (\n{body}\n);", quote_ident(dialect, name))
}

/// Emits one `CREATE TABLE` statement per base table, plus one per SCD
/// companion table for those that have one (§3.3), in declaration order.
pub fn render_schema(dialect: Dialect) -> String {
    let mut out = String::new();
    for table in TABLES {
        out.push_str(&create_table_sql(dialect, table, table.name, table.columns, table.primary_key));
        out.push_str("\n\n");

        if table.has_scd {
            let scd_name = table.scd_table_name();
            let scd_pk = table.scd_primary_key();
            out.push_str(&create_table_sql(dialect, table, &scd_name, table.columns, &scd_pk));
            out.push_str("\n\n");
        }
    }
    out.truncate(out.trim_end().len());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_dialect_renders_without_panicking() {
        for dialect in [Dialect::Postgresql, Dialect::Mysql, Dialect::Sqlite, Dialect::Oracle, Dialect::SqlServer] {
            let sql = render_schema(dialect);
            assert!(sql.contains("CREATE TABLE"));
        }
    }

    #[test]
    fn sqlite_output_quotes_with_double_quotes() {
        let sql = render_schema(Dialect::Sqlite);
        assert!(sql.contains("\"server\""));
        assert!(sql.contains("\"server_scd\""));
    }

    #[test]
    fn scd_companion_has_observed_at_in_primary_key() {
        let sql = render_schema(Dialect::Sqlite);
        let scd_start = sql.find("CREATE TABLE \"server_scd\"").unwrap();
        let scd_block = &sql[scd_start..];
        let pk_line = scd_block.lines().find(|l| l.contains("pk_server_scd")).unwrap();
        assert!(pk_line.contains("observed_at"));
    }
}
