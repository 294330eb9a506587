use anyhow::anyhow;
use clap::Parser;
use pager::{
    Cursor, FieldKind, FieldValue, HasMany, PaginationArgs, PagingLimits, Record,
};
use pager_database::{PagerConnectionPool, PgRelation};
use pager_lib::{
    config::{PagerArgs, PagerConfig, RelationConfig},
    defaults,
    utils::init_logging,
};
use serde_json::{Map, Value};
use std::{str::FromStr, sync::Arc};
use tracing::info;

#[derive(Debug, Parser, Clone)]
#[clap(about = "Print one page of a configured relation as JSON.")]
pub struct Command {
    #[clap(flatten)]
    pub args: PagerArgs,

    /// Name of the relation to paginate.
    #[clap(long, help = "Name of the relation to paginate.")]
    pub relation: String,

    /// Key of the parent row whose children are paginated.
    #[clap(long, help = "Key of the parent row whose children are paginated.")]
    pub parent: String,

    #[clap(long, help = "Return at most this many rows after `--after`.")]
    pub first: Option<u64>,

    #[clap(long, help = "Return rows after this cursor.")]
    pub after: Option<String>,

    #[clap(long, help = "Return at most this many rows before `--before`.")]
    pub last: Option<u64>,

    #[clap(long, help = "Return rows before this cursor.")]
    pub before: Option<String>,

    #[clap(long, help = "Ordering selector declared for the relation.")]
    pub order_by: Option<String>,
}

/// Parse the parent key as the kind declared for the relation's foreign key.
pub fn parse_key(config: &RelationConfig, key: &str) -> anyhow::Result<FieldValue> {
    let column = config
        .columns
        .iter()
        .find(|c| c.name == config.foreign_key)
        .ok_or_else(|| {
            anyhow!(
                "Foreign key {:?} of {:?} must be declared in its columns",
                config.foreign_key,
                config.name
            )
        })?;
    let kind = FieldKind::from_str(&column.kind)
        .map_err(|_| anyhow!("Column {:?} has unsupported kind {:?}", column.name, column.kind))?;

    Ok(kind.parse_value(key)?)
}

pub fn record_json(record: Record) -> Value {
    let map = record
        .iter()
        .map(|(column, value)| {
            let value = match value {
                FieldValue::Int(i) => Value::from(*i),
                FieldValue::String(s) => Value::from(s.clone()),
                FieldValue::Boolean(b) => Value::from(*b),
                FieldValue::Timestamp(t) => Value::from(t.to_rfc3339()),
            };
            (column.to_string(), value)
        })
        .collect::<Map<_, _>>();
    Value::Object(map)
}

pub async fn exec(command: Command) -> anyhow::Result<()> {
    let Command {
        args,
        relation,
        parent,
        first,
        after,
        last,
        before,
        order_by,
    } = command;

    let config = PagerConfig::from_args(args)?;
    init_logging(&config)?;

    info!("Configuration: {:?}", config);

    let relation_config = config
        .relation(&relation)
        .ok_or_else(|| anyhow!("No relation named {relation:?} is configured"))?;

    let pool = PagerConnectionPool::connect(
        config.database.connection_url()?.as_str(),
        defaults::POSTGRES_MAX_CONNECTIONS,
    )
    .await?;

    let source = Arc::new(PgRelation::from_config(pool, relation_config)?);
    let association = HasMany::from_config(source, relation_config)?
        .limits(PagingLimits::from(&config.paging));

    let parent = Record::new().with(
        relation_config.source_key.clone(),
        parse_key(relation_config, &parent)?,
    );
    let args = PaginationArgs {
        first,
        after: after.map(Cursor::from),
        last,
        before: before.map(Cursor::from),
        order_by,
    };

    let connection = association.paginate(&parent, &args).await?;
    info!(
        "Fetched {} rows from {:?}",
        connection.edges.len(),
        relation_config.table
    );

    let output = serde_json::to_string_pretty(&connection.map(record_json))?;
    println!("{output}");

    Ok(())
}
