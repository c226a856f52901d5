// Convert the dashboard workbook (or a CSV export) into the SQLite file the server reads.
//
// Usage:
//   cargo run --bin convert_workbook -- <xlsx|csv> [db_path] [--sheet NAME]
//
// All cells are stored as TEXT; "nan"/empty cells become NULL. The target table is
// dropped and recreated on every run.

use aeo_dashboard::db::{find_main_table, open_sqlite_connection, table_columns};
use aeo_dashboard::importer::file_parser::DEFAULT_SHEET_NAME;
use aeo_dashboard::importer::{load_table, UniversalFileParser, DEFAULT_TABLE_NAME};
use aeo_dashboard::repository::ReportRepository;
use aeo_dashboard::schema::ResolvedSchema;
use anyhow::{bail, Context};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

struct Args {
    input: PathBuf,
    db_path: PathBuf,
    sheet: String,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut sheet = DEFAULT_SHEET_NAME.to_string();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sheet" => {
                sheet = args.next().context("--sheet 需要工作表名")?;
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let input = match positional.next() {
        Some(p) => PathBuf::from(p),
        None => bail!("用法: convert_workbook <xlsx|csv> [db_path] [--sheet NAME]"),
    };
    let db_path = positional
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| input.with_extension("db"));

    Ok(Args {
        input,
        db_path,
        sheet,
    })
}

fn main() -> anyhow::Result<()> {
    aeo_dashboard::logging::init();
    let args = parse_args()?;

    let raw = UniversalFileParser::new(args.sheet.as_str())
        .parse(&args.input)
        .with_context(|| format!("解析失败: {}", args.input.display()))?;

    let mut conn = open_sqlite_connection(&args.db_path.to_string_lossy())
        .with_context(|| format!("无法打开数据库: {}", args.db_path.display()))?;
    let summary = load_table(&mut conn, DEFAULT_TABLE_NAME, &raw).context("写入数据表失败")?;

    println!("db={}", args.db_path.display());
    println!("table={}", summary.table);
    println!("rows={}", summary.rows);
    println!("columns={}", summary.columns);

    let table = find_main_table(&conn, Some(DEFAULT_TABLE_NAME))?
        .context("写入后未找到数据表")?;
    let columns = table_columns(&conn, &table)?;
    let schema = Arc::new(ResolvedSchema::resolve(&table, &columns));
    for field in schema.unresolved() {
        println!("unresolved={}", field);
    }

    let repo = ReportRepository::from_connection(Arc::new(Mutex::new(conn)), schema);
    let stats = repo.stats().context("统计失败")?;
    println!("unique_programs={}", stats.unique_programs);
    println!("unique_configs={}", stats.unique_configs);
    println!("unique_parts={}", stats.unique_parts);
    println!("unique_suppliers={}", stats.unique_suppliers);

    Ok(())
}
