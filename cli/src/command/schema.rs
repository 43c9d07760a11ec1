//! `schema <dialect>` (§6.2): prints `CREATE TABLE` statements for one of
//! the five named dialects to stdout. Pure text generation — never opens a
//! connection.

use sc_db::dialect::Dialect;
use sc_db::ddl;

pub fn execute(dialect: Dialect) {
    print!("{}", ddl::render_schema(dialect));
}
