mod args;

use std::{
  path::{Path, PathBuf},
  time::Instant,
};

use ansi_term::Colour;
use args::{AnnotateArgs, InputArgs, OutputArgs};
use clap::Parser;
use itertools::Itertools;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use unchunk::{ModuleTransformations, Unbundler, UnbundlerOptions};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Commands {
  #[clap(flatten)]
  input: InputArgs,

  #[clap(flatten)]
  output: OutputArgs,

  #[clap(flatten)]
  annotate: AnnotateArgs,

  /// Suppress log output.
  #[clap(long)]
  silent: bool,
}

enum Verdict {
  Chunk { chunk_id: u64, modules: Vec<String> },
  NotAChunk,
  Failed(Vec<anyhow::Error>),
}

fn init_tracing(silent: bool) {
  let filter = if silent {
    EnvFilter::new("off")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("unchunk=info"))
  };
  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_target(false).compact())
    .init();
}

fn load_transformations(path: Option<&Path>) -> anyhow::Result<Option<ModuleTransformations>> {
  let Some(path) = path else {
    return Ok(None);
  };
  let text = std::fs::read_to_string(path)?;
  Ok(Some(serde_json::from_str(&text)?))
}

async fn probe_file(unbundler: &Unbundler, path: &Path) -> Verdict {
  match tokio::fs::read_to_string(path).await {
    Ok(source) => match unbundler.unbundle(source).await {
      Ok(Some(chunk)) => Verdict::Chunk {
        chunk_id: chunk.chunk_id,
        modules: chunk.modules.keys().map(ToString::to_string).collect(),
      },
      Ok(None) => Verdict::NotAChunk,
      Err(errors) => Verdict::Failed(errors.into_vec()),
    },
    Err(error) => Verdict::Failed(vec![error.into()]),
  }
}

#[tokio::main]
async fn main() {
  let args = Commands::parse();
  init_tracing(args.silent);

  let module_transformations = match load_transformations(args.input.transformations.as_deref()) {
    Ok(table) => table,
    Err(error) => {
      eprintln!("{} {}", Colour::Red.paint("Error:"), error);
      std::process::exit(1);
    }
  };

  let unbundler = Unbundler::new(UnbundlerOptions {
    esm_default_exports: Some(!args.output.cjs_default_exports),
    include_variable_declaration_comments: Some(args.annotate.declaration_comments),
    include_variable_reference_comments: Some(args.annotate.reference_comments),
    module_transformations,
    dir: args.output.dir,
    graph: None,
  });

  let start = Instant::now();

  // every input shares the one graph and runs concurrently
  let outcomes: Vec<(PathBuf, Verdict)> =
    futures::future::join_all(args.input.inputs.iter().map(|path| {
      let unbundler = &unbundler;
      async move { (path.clone(), probe_file(unbundler, path).await) }
    }))
    .await;

  let dim = Colour::White.dimmed();
  for (path, verdict) in outcomes {
    match verdict {
      Verdict::Chunk { chunk_id, modules } => println!(
        "{} {} chunk {} │ {} modules: {}",
        Colour::Green.paint("✔"),
        path.display(),
        Colour::Cyan.paint(chunk_id.to_string()),
        modules.len(),
        dim.paint(modules.iter().join(", "))
      ),
      Verdict::NotAChunk => {
        println!("{} {} {}", dim.paint("·"), path.display(), dim.paint("not a chunk"));
      }
      Verdict::Failed(errors) => {
        for error in errors {
          println!("{} {} {}", Colour::Red.paint("Error:"), path.display(), error);
        }
      }
    }
  }

  if let Some(graph_path) = args.output.graph {
    let snapshot = unbundler.graph().snapshot();
    let written = serde_json::to_string_pretty(&snapshot)
      .map_err(anyhow::Error::from)
      .and_then(|json| std::fs::write(&graph_path, json).map_err(anyhow::Error::from));
    match written {
      Ok(()) => println!("{} graph written to {}", Colour::Green.paint("✔"), graph_path.display()),
      Err(error) => println!("{} {}", Colour::Red.paint("Error:"), error),
    }
  }

  let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
  println!("\n{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed));
}
