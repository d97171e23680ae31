mod provenance;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hypersimplex::embedding::embed;
use hypersimplex::gimatrix::GiMatrix;
use hypersimplex::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use provenance::{write_sidecar, Provenance};

#[derive(Parser)]
#[command(name = "hypersimplex-cli")]
#[command(about = "Symmetric embeddings and Schlegel diagrams of hypersimplices")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Build Δ(d,k), embed it for one transitive subgroup and print the JSON report
    Run(RunArgs),
    /// List the vertex-transitive subgroups of Δ(d,k)
    Subgroups {
        #[command(flatten)]
        target: Target,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args)]
struct Target {
    #[arg(long)]
    d: usize,
    #[arg(long)]
    k: usize,
    #[arg(long, value_enum, default_value_t = ServiceKind::Native)]
    service: ServiceKind,
    /// GAP executable, for `--service gap`
    #[arg(long, default_value = "gap")]
    gap_bin: PathBuf,
    /// Largest group the native service will enumerate
    #[arg(long, default_value_t = NativeCfg::default().max_order)]
    max_order: usize,
}

#[derive(Args)]
struct RunArgs {
    #[command(flatten)]
    target: Target,
    /// Position among the transitive subgroups (default: the whole group)
    #[arg(long)]
    subgroup: Option<usize>,
    #[arg(long, value_enum, default_value_t = ModeArg::Clustered)]
    mode: ModeArg,
    /// Class parameters, comma separated (default: uniform)
    #[arg(long, value_delimiter = ',')]
    weights: Option<Vec<f64>>,
    /// Facet pair for the Schlegel diagram
    #[arg(long)]
    facet: Option<usize>,
    /// Project onto the larger facet of the pair
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    larger: bool,
    /// Write the report here (plus a provenance sidecar) instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ServiceKind {
    Native,
    Gap,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Clustered,
    Top,
    DegenerateOnly,
}

impl From<ModeArg> for EmbedMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Clustered => EmbedMode::Clustered,
            ModeArg::Top => EmbedMode::Top,
            ModeArg::DegenerateOnly => EmbedMode::DegenerateOnly,
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run(args) => run(args),
        Action::Subgroups { target } => subgroups(target),
        Action::Report => report(),
    }
}

fn service(target: &Target) -> Result<Box<dyn GroupService>> {
    Ok(match target.service {
        ServiceKind::Native => Box::new(NativeService::new(NativeCfg {
            max_order: target.max_order,
        })),
        ServiceKind::Gap => {
            let cfg = GapCfg {
                program: target.gap_bin.clone(),
                ..GapCfg::default()
            };
            Box::new(GapService::spawn(&cfg).context("starting GAP")?)
        }
    })
}

fn build(target: &Target, cfg: PipelineCfg) -> Result<Representer> {
    tracing::info!(d = target.d, k = target.k, "build");
    let rep = Representer::build(target.d, target.k, service(target)?, cfg, &CancelToken::new())
        .with_context(|| format!("building Δ({}, {})", target.d, target.k))?;
    if rep.subgroups().is_empty() {
        bail!("Δ({}, {}) has no vertex-transitive subgroup", target.d, target.k);
    }
    Ok(rep)
}

fn run(args: RunArgs) -> Result<()> {
    let embed_cfg = EmbedCfg {
        mode: args.mode.into(),
        ..EmbedCfg::default()
    };
    let schlegel_cfg = SchlegelCfg {
        project_to_larger: args.larger,
        ..SchlegelCfg::default()
    };
    let rep = build(
        &args.target,
        PipelineCfg {
            embed: embed_cfg,
            schlegel: schlegel_cfg,
        },
    )?;
    let position = args.subgroup.unwrap_or(rep.subgroups().len() - 1);
    let summary = rep
        .subgroups()
        .get(position)
        .with_context(|| format!("no transitive subgroup at position {position}"))?;
    tracing::info!(position, subgroup = %summary.name, "embed");

    let (gi, embedding) = weigh_and_embed(&rep, position, args.weights.as_deref())?;
    let schlegel = match args.facet {
        Some(f) => {
            let diagram = rep.schlegel(&embedding, f)?;
            json!({
                "facet": f,
                "image_facet": diagram.image_facet(),
                "points": rows(diagram.points()),
            })
        }
        None => Value::Null,
    };

    let params = json!({
        "d": args.target.d,
        "k": args.target.k,
        "subgroup": position,
        "mode": embed_cfg.mode,
        "weights": gi.weights(),
        "facet": args.facet,
        "larger": args.larger,
    });
    let hs = rep.hypersimplex();
    let doc = json!({
        "group": rep.group().handle(),
        "subgroups": rep.subgroups(),
        "subgroup": summary,
        "vertices": hs.vertices().map(|v| v.comps().to_vec()).collect::<Vec<_>>(),
        "classes": rep.classes(position)?,
        "weights": gi.weights(),
        "multiplied_weights": gi.multiplied_weights(),
        "spectrum": embedding.spectrum(),
        "eigenvalues": embedding.eigenvalues(),
        "embedding": rows(embedding.points()),
        "schlegel": schlegel,
    });
    emit(doc, params, args.out.as_deref())
}

/// Invariant matrix with the requested weights, and its embedding under the
/// representer's stored settings.
fn weigh_and_embed(
    rep: &Representer,
    position: usize,
    weights: Option<&[f64]>,
) -> Result<(GiMatrix, Embedding)> {
    let mut gi = rep.gi_matrix(position)?;
    if let Some(w) = weights {
        gi.set_weights(w).context("rejected --weights")?;
    }
    let embedding = embed(gi.matrix(), rep.hypersimplex().d(), &rep.cfg().embed)?;
    Ok((gi, embedding))
}

fn subgroups(target: Target) -> Result<()> {
    let rep = build(&target, PipelineCfg::default())?;
    let doc = json!({
        "group": rep.group().handle(),
        "subgroups": rep.subgroups(),
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn report() -> Result<()> {
    let prov = Provenance::new(json!({}));
    println!("{}", serde_json::to_string_pretty(&prov)?);
    Ok(())
}

fn emit(mut doc: Value, params: Value, out: Option<&Path>) -> Result<()> {
    let prov = Provenance::new(params);
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, serde_json::to_vec_pretty(&doc)?)
                .with_context(|| format!("writing {}", path.display()))?;
            let sidecar = write_sidecar(path, prov)?;
            tracing::info!(out = %path.display(), sidecar = %sidecar.display(), "report written");
        }
        None => {
            doc["provenance"] = serde_json::to_value(&prov)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}

fn rows(points: &[DVector<f64>]) -> Vec<Vec<f64>> {
    points.iter().map(|p| p.as_slice().to_vec()).collect()
}
