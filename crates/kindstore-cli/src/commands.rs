use std::sync::Arc;

use anyhow::{bail, Context as _};
use colored::Colorize;

use kindstore_kv::{InMemoryKv, KvBackend};
use kindstore_store::{Context, KindRegistry, KvObjectDb, ObjectDb};
use kindstore_types::{Animal, Object, Person, Record};

use crate::cli::*;
use crate::config::{BackendKind, CliConfig};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;
    let db = open_db(&config).await?;
    let ctx = command_context(&config);
    let out = Output { format: cli.format };

    match cli.command {
        Command::Demo => cmd_demo(&db, &ctx, &out).await,
        Command::PutPerson(args) => {
            let mut person = Person::new(args.name, args.age);
            cmd_put(&db, &ctx, &out, &mut person).await
        }
        Command::PutAnimal(args) => {
            let mut animal = Animal::new(args.name, args.species);
            cmd_put(&db, &ctx, &out, &mut animal).await
        }
        Command::Get(args) => {
            let obj = db
                .get_object_by_id(&ctx, &args.id)
                .await
                .with_context(|| format!("get {}", args.id))?;
            out.object(obj.as_ref())
        }
        Command::Find(args) => {
            let obj = db
                .get_object_by_name(&ctx, &args.name)
                .await
                .with_context(|| format!("find {:?}", args.name))?;
            out.object(obj.as_ref())
        }
        Command::List(args) => {
            let objects = db
                .list_objects(&ctx, &args.kind)
                .await
                .with_context(|| format!("list {}", args.kind))?;
            out.objects(&objects)
        }
        Command::Delete(args) => {
            db.delete_object(&ctx, &args.id)
                .await
                .with_context(|| format!("delete {}", args.id))?;
            out.deleted(&args.id);
            Ok(())
        }
        Command::Kinds => {
            out.kinds(&db.registry().kinds());
            Ok(())
        }
    }
}

async fn open_db(config: &CliConfig) -> anyhow::Result<KvObjectDb> {
    let backend: Arc<dyn KvBackend> = match config.backend {
        BackendKind::Memory => Arc::new(InMemoryKv::new()),
        BackendKind::Redis => connect_redis(config).await?,
    };
    let db = KvObjectDb::with_registry(
        backend,
        KindRegistry::with_builtin(),
        config.store.clone(),
    )?;
    tracing::debug!(backend = ?config.backend, "opened object store");
    Ok(db)
}

#[cfg(feature = "redis")]
async fn connect_redis(config: &CliConfig) -> anyhow::Result<Arc<dyn KvBackend>> {
    let kv = kindstore_kv::RedisKv::connect(config.redis.clone())
        .await
        .with_context(|| format!("connecting to {}", config.redis.url))?;
    Ok(Arc::new(kv))
}

#[cfg(not(feature = "redis"))]
async fn connect_redis(_config: &CliConfig) -> anyhow::Result<Arc<dyn KvBackend>> {
    bail!("redis backend requested but kindstore was built without the `redis` feature")
}

/// Context for one command: the configured timeout, cancelled on Ctrl-C.
fn command_context(config: &CliConfig) -> Context {
    let ctx = match config.timeout() {
        Some(timeout) => Context::with_timeout(timeout),
        None => Context::background(),
    };
    let on_interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling");
            on_interrupt.cancel();
        }
    });
    ctx
}

async fn cmd_put(
    db: &KvObjectDb,
    ctx: &Context,
    out: &Output,
    object: &mut dyn Object,
) -> anyhow::Result<()> {
    db.store(ctx, object)
        .await
        .with_context(|| format!("store {} {:?}", object.kind(), object.name()))?;
    out.stored(object)
}

async fn cmd_demo(db: &KvObjectDb, ctx: &Context, out: &Output) -> anyhow::Result<()> {
    let mut alice = Person::new("Alice", 30);
    let mut bob = Person::new("Bob", 25);
    let mut fluffy = Animal::new("Fluffy", "cat");
    let mut rover = Animal::new("Rover", "dog");

    for object in [
        &mut alice as &mut dyn Object,
        &mut bob,
        &mut fluffy,
        &mut rover,
    ] {
        db.store(ctx, object)
            .await
            .with_context(|| format!("store {}", object.name()))?;
        out.stored(object)?;
    }

    println!("\n{} {}", "Get by id".bold(), alice.id.yellow());
    let obj = db.get_object_by_id(ctx, &alice.id).await.context("get by id")?;
    let Some(person) = obj.downcast_ref::<Person>() else {
        bail!("id {} did not hold a person", alice.id);
    };
    out.object(person)?;

    println!("\n{} {}", "Get by name".bold(), fluffy.name.yellow());
    let obj = db
        .get_object_by_name(ctx, &fluffy.name)
        .await
        .context("get by name")?;
    let Some(animal) = obj.downcast_ref::<Animal>() else {
        bail!("{:?} did not name an animal", fluffy.name);
    };
    out.object(animal)?;

    println!("\n{} {}", "List".bold(), Person::KIND.cyan());
    let people = db.list_objects(ctx, Person::KIND).await.context("list")?;
    out.objects(&people)?;

    println!("\n{} {}", "Delete".bold(), rover.id.yellow());
    db.delete_object(ctx, &rover.id).await.context("delete")?;
    match db.get_object_by_id(ctx, &rover.id).await {
        Err(e) if e.is_not_found() => println!("{} {} is gone", "✓".green(), rover.name),
        Err(e) => return Err(e).context("verify delete"),
        Ok(_) => bail!("{} still present after delete", rover.id),
    }
    Ok(())
}

struct Output {
    format: OutputFormat,
}

impl Output {
    fn stored(&self, object: &dyn Object) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!(
                    "{} Stored {} {} as {}",
                    "✓".green().bold(),
                    object.kind().cyan(),
                    object.name().bold(),
                    object.id().yellow()
                );
                Ok(())
            }
            OutputFormat::Json => self.object(object),
        }
    }

    fn deleted(&self, id: &str) {
        match self.format {
            OutputFormat::Text => println!("{} Deleted {}", "✓".green(), id.yellow()),
            OutputFormat::Json => println!("{}", deleted_json(id)),
        }
    }

    fn kinds(&self, kinds: &[&str]) {
        match self.format {
            OutputFormat::Text => {
                for kind in kinds {
                    println!("{}", kind.cyan());
                }
            }
            OutputFormat::Json => println!("{}", serde_json::json!(kinds)),
        }
    }

    fn object(&self, object: &dyn Object) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!(
                    "{}:{}  {:?}",
                    object.kind().cyan(),
                    object.id().yellow(),
                    object
                );
            }
            OutputFormat::Json => println!("{}", to_json(object)?),
        }
        Ok(())
    }

    fn objects(&self, objects: &[Box<dyn Object>]) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Text => {
                if objects.is_empty() {
                    println!("(none)");
                }
                for object in objects {
                    self.object(object.as_ref())?;
                }
            }
            OutputFormat::Json => {
                let values = objects
                    .iter()
                    .map(|o| to_json(o.as_ref()))
                    .collect::<anyhow::Result<Vec<_>>>()?;
                println!("{}", serde_json::Value::Array(values));
            }
        }
        Ok(())
    }
}

fn deleted_json(id: &str) -> serde_json::Value {
    serde_json::json!({ "deleted": id })
}

fn to_json(object: &dyn Object) -> anyhow::Result<serde_json::Value> {
    let payload = object.encode().context("encoding object")?;
    Ok(serde_json::from_slice(&payload)?)
}
