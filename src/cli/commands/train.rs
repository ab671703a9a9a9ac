//! Train command - Train agents on a grid environment and report the result

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    analysis::{RewardSummary, render_policy, render_position_policy},
    app::{AgentConfig, App, AppBuilder, ExperimentConfig},
    cli::output::{
        format_number, format_percent, format_reward, print_block, print_kv, print_section,
        print_subsection,
    },
    environment::{DispatchGrid, GridWorld, IN_VEHICLE},
    pipeline::{EvaluationResult, JsonlObserver, ProgressObserver, TrainingResult},
    ports::{Agent, Environment},
    types::{AgentKind, EnvironmentKind},
};

#[derive(Parser, Debug)]
#[command(about = "Train agents on a grid environment")]
pub struct TrainArgs {
    /// Environment (hazard-grid, hole-grid, dispatch-grid, forage-grid)
    #[arg(long, short = 'e')]
    pub env: Option<EnvironmentKind>,

    /// Agents to train, each on a fresh environment (repeatable)
    #[arg(long, short = 'a')]
    pub agent: Vec<AgentKind>,

    /// Number of training episodes
    #[arg(long, short = 'n')]
    pub episodes: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of greedy evaluation episodes
    #[arg(long)]
    pub eval_episodes: Option<usize>,

    /// Step ceiling for each evaluation episode
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Experiment description (JSON); flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Write the learning curve as CSV
    #[arg(long)]
    pub export_rewards: Option<PathBuf>,

    /// Write per-step snapshots as JSON Lines
    #[arg(long)]
    pub snapshots: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Merge the optional config file with command-line overrides.
pub fn resolve_experiment(args: &TrainArgs) -> Result<ExperimentConfig> {
    let mut experiment = match &args.config {
        Some(path) => ExperimentConfig::load(path)
            .with_context(|| format!("Failed to load experiment from {}", path.display()))?,
        None => ExperimentConfig::default(),
    };

    if let Some(env) = args.env {
        experiment.environment = env;
    }
    if !args.agent.is_empty() {
        experiment.agents = args
            .agent
            .iter()
            .map(|kind| AgentConfig::for_kind(*kind))
            .collect();
    }
    if let Some(episodes) = args.episodes {
        experiment.training.episodes = episodes;
    }
    if let Some(seed) = args.seed {
        experiment.training.seed = Some(seed);
        experiment.evaluation.seed = Some(seed);
    }
    if let Some(episodes) = args.eval_episodes {
        experiment.evaluation.episodes = episodes;
    }
    if let Some(max_steps) = args.max_steps {
        experiment.evaluation.max_steps = max_steps;
    }
    Ok(experiment)
}

/// Output tag for the `index`-th agent; the index keeps agents of the same
/// kind from sharing a file.
fn agent_tag(index: usize, name: &str) -> String {
    format!("{}-{name}", index + 1)
}

/// `path` with `-{tag}` appended to the file stem, used when several agents
/// share one output flag.
fn tagged_path(path: &Path, tag: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tag = tag.to_ascii_lowercase().replace(' ', "-");
    let mut file_name = format!("{stem}-{tag}");
    if let Some(ext) = path.extension() {
        file_name.push('.');
        file_name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(file_name)
}

/// Policy grids worth showing for `env`, with a caption each.
fn policy_views(agent: &dyn Agent, env: &GridWorld) -> crate::Result<Vec<(String, String)>> {
    let q_table = agent.q_table();
    match env {
        GridWorld::Hazard(_) | GridWorld::Hole(_) => Ok(vec![(
            "greedy action per cell".to_string(),
            render_position_policy(q_table, env)?,
        )]),
        GridWorld::Dispatch(_) => {
            let cols = env.grid_cols();
            let mut views = Vec::new();
            for (caption, passenger) in [("passenger waiting at R", 0), ("passenger aboard", IN_VEHICLE)] {
                let grid = render_policy(q_table, env, |pos| {
                    DispatchGrid::encode(pos / cols, pos % cols, passenger, 1)
                })?;
                views.push((format!("{caption}, destination G"), grid));
            }
            Ok(views)
        }
        GridWorld::Forage(forage) => {
            let mut views = Vec::new();
            for (caption, eaten, drunk) in [
                ("nothing collected", false, false),
                ("food and water collected", true, true),
            ] {
                let grid = render_policy(q_table, env, |pos| forage.encode(pos, eaten, drunk))?;
                views.push((caption.to_string(), grid));
            }
            Ok(views)
        }
    }
}

fn print_training(result: &TrainingResult) {
    let summary = RewardSummary::from_rewards(&result.episode_rewards);
    print_kv("Episodes", &format_number(summary.episodes));
    print_kv("Mean reward", &format_reward(summary.mean));
    print_kv(
        &format!("Last {} mean", summary.window),
        &format_reward(summary.last_window_mean),
    );
    print_kv("Best episode", &format_reward(summary.best));
    print_kv("Worst episode", &format_reward(summary.worst));
    print_kv("Final exploration", &format!("{:.4}", result.final_exploration));
}

fn print_evaluation(result: &EvaluationResult) {
    print_kv("Episodes", &format_number(result.episodes));
    print_kv("Success rate", &format_percent(result.success_rate));
    print_kv(
        "Steps to success",
        &result
            .mean_steps_to_success
            .map_or_else(|| "n/a".to_string(), |s| format!("{s:.2}")),
    );
    print_kv("Mean reward", &format_reward(result.mean_reward));
    if result.truncated > 0 {
        print_kv("Hit step ceiling", &format_number(result.truncated));
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let experiment = resolve_experiment(&args)?;
    let app = match args.seed {
        Some(seed) => AppBuilder::new().with_default_seed(seed).build(),
        None => App::new(),
    };
    let several = experiment.agents.len() > 1;

    print_section(&format!("Training on {}", experiment.environment));
    print_kv("Agents", &experiment.agents.len().to_string());
    print_kv("Episodes", &format_number(experiment.training.episodes));
    print_kv(
        "Seed",
        &experiment
            .training
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string()),
    );

    for (index, agent_config) in experiment.agents.iter().enumerate() {
        let mut env = app.create_environment(experiment.environment);
        let mut agent = app
            .create_agent(agent_config, &env)
            .context("Failed to create agent")?;
        let name = agent.name().to_string();
        let tag = agent_tag(index, &name);

        let mut pipeline = app.create_pipeline(&experiment);
        if !args.no_progress {
            pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
        }
        if let Some(path) = &args.snapshots {
            let path = if several { tagged_path(path, &tag) } else { path.clone() };
            let observer = JsonlObserver::new(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            pipeline = pipeline.with_observer(Box::new(observer));
        }

        print_subsection(&name);
        let result = pipeline
            .run(&mut agent, &mut env)
            .with_context(|| format!("Training {name} failed"))?;
        print_training(&result);

        let evaluation = app
            .create_evaluator(&experiment)
            .evaluate(&agent, &mut env)
            .with_context(|| format!("Evaluating {name} failed"))?;
        println!();
        print_evaluation(&evaluation);

        for (caption, grid) in policy_views(&agent, &env)? {
            println!("\n  Policy ({caption}):");
            print_block(&grid);
        }

        if let Some(path) = &args.export_rewards {
            let path = if several { tagged_path(path, &tag) } else { path.clone() };
            result
                .export_rewards(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_kv("Learning curve", &path.display().to_string());
        }
    }

    Ok(())
}
