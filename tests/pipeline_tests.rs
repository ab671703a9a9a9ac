//! Tests for the training pipeline, observers, and evaluator

mod common;

use std::{
    fs,
    sync::{Arc, Mutex, mpsc},
};

use tdgrid::{
    app::AgentConfig,
    environment::{DispatchGrid, EnvironmentDetail, GridWorld, HazardGrid, HoleGrid},
    pipeline::{
        ChannelObserver, EvaluationConfig, Evaluator, JsonlObserver, MetricsObserver, Observer,
        StepSnapshot, TrainingConfig, TrainingPipeline, TrainingResult,
    },
    ports::{Agent, Environment},
    q_learning::TdAgent,
    types::{AgentKind, EnvironmentKind},
};

/// Records the order of observer callbacks.
#[derive(Clone, Default)]
struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

impl Observer for EventLog {
    fn on_training_start(&mut self, total_episodes: usize) -> tdgrid::Result<()> {
        self.0.lock().unwrap().push(format!("start {total_episodes}"));
        Ok(())
    }

    fn on_episode_start(&mut self, episode: usize) -> tdgrid::Result<()> {
        self.0.lock().unwrap().push(format!("episode {episode}"));
        Ok(())
    }

    fn on_step(&mut self, snapshot: &StepSnapshot) -> tdgrid::Result<()> {
        self.0.lock().unwrap().push(format!("step {}", snapshot.step));
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, _reward: f64, steps: usize) -> tdgrid::Result<()> {
        self.0.lock().unwrap().push(format!("end {episode} {steps}"));
        Ok(())
    }

    fn on_training_end(&mut self) -> tdgrid::Result<()> {
        self.0.lock().unwrap().push("finish".to_string());
        Ok(())
    }
}

#[test]
fn test_q_learning_solves_hole_grid() {
    let mut env = HoleGrid::new();
    let config = AgentConfig::for_kind(AgentKind::QLearning);
    assert_eq!(config.learning_rate, 0.5);
    assert_eq!(config.discount_factor, 0.99);
    let mut agent = TdAgent::new(env.num_states(), env.num_actions(), &config).unwrap();

    let result = TrainingPipeline::new(TrainingConfig::default().with_episodes(50_000).with_seed(2024))
        .run(&mut agent, &mut env)
        .unwrap();
    assert_eq!(result.episodes(), 50_000);

    let (path, final_reward, finished) = common::greedy_rollout(agent.q_table(), &mut env, 50);
    assert!(finished, "greedy policy never terminated: {path:?}");
    assert_eq!(*path.last().unwrap(), env.goal_state());
    assert_eq!(final_reward, 1.0);
    assert!(path.iter().all(|s| !env.is_hole(*s)), "stepped into a hole: {path:?}");
    assert!(path.len() - 1 <= 20, "greedy path too long: {path:?}");

    let evaluation = Evaluator::new(EvaluationConfig::default().with_episodes(10).with_seed(1))
        .evaluate(&agent, &mut env)
        .unwrap();
    assert_eq!(evaluation.success_rate, 1.0);
    assert_eq!(evaluation.mean_steps_to_success, Some((path.len() - 1) as f64));
}

#[test]
fn test_sarsa_improves_on_hazard_grid() {
    let mut env = HazardGrid::new();
    let mut agent = TdAgent::sarsa(env.num_states(), env.num_actions()).unwrap();
    let result = TrainingPipeline::new(TrainingConfig::default().with_episodes(500).with_seed(9))
        .run(&mut agent, &mut env)
        .unwrap();

    let early: f64 = result.episode_rewards[..50].iter().sum::<f64>() / 50.0;
    let late = *result.rolling_mean(50).last().unwrap();
    assert!(late > early, "late {late} should beat early {early}");
    assert!(result.final_exploration < 0.1);
}

#[test]
fn test_observer_callbacks_follow_episode_shape() {
    let log = EventLog::default();
    let mut env = HazardGrid::new();
    let mut agent = TdAgent::q_learning(env.num_states(), env.num_actions()).unwrap();
    let result = TrainingPipeline::new(TrainingConfig::default().with_episodes(2).with_seed(4))
        .with_observer(Box::new(log.clone()))
        .run(&mut agent, &mut env)
        .unwrap();

    let events = log.events();
    assert_eq!(events.first().unwrap(), "start 2");
    assert_eq!(events[1], "episode 0");
    assert_eq!(events[2], "step 0");
    assert_eq!(events.last().unwrap(), "finish");
    let first_len = result.episode_lengths[0];
    assert_eq!(events[2 + first_len + 1], format!("end 0 {first_len}"));
    let steps = events.iter().filter(|e| e.starts_with("step ")).count();
    assert_eq!(steps, result.episode_lengths.iter().sum::<usize>() + 2);
}

#[test]
fn test_metrics_observer_sees_every_episode() {
    struct Shared(Arc<Mutex<MetricsObserver>>);
    impl Observer for Shared {
        fn on_step(&mut self, snapshot: &StepSnapshot) -> tdgrid::Result<()> {
            self.0.lock().unwrap().on_step(snapshot)
        }
        fn on_episode_end(&mut self, episode: usize, reward: f64, steps: usize) -> tdgrid::Result<()> {
            self.0.lock().unwrap().on_episode_end(episode, reward, steps)
        }
    }

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut env = HoleGrid::new();
    let mut agent = TdAgent::q_learning(env.num_states(), env.num_actions()).unwrap();
    let result = TrainingPipeline::new(TrainingConfig::default().with_episodes(30).with_seed(8))
        .with_observer(Box::new(Shared(Arc::clone(&metrics))))
        .run(&mut agent, &mut env)
        .unwrap();

    let metrics = metrics.lock().unwrap();
    assert_eq!(metrics.episodes(), 30);
    assert_eq!(metrics.mean_reward(), result.mean_reward());
    assert_eq!(metrics.steps_seen(), result.episode_lengths.iter().sum::<usize>() + 30);
}

#[test]
fn test_channel_observer_never_blocks_training() {
    let (tx, rx) = mpsc::sync_channel(8);
    let mut env = GridWorld::from_kind(EnvironmentKind::DispatchGrid, Some(3));
    let mut agent = TdAgent::q_learning(env.num_states(), env.num_actions()).unwrap();
    let result = TrainingPipeline::new(TrainingConfig::default().with_episodes(20).with_seed(3))
        .with_observer(Box::new(ChannelObserver::new(tx)))
        .run(&mut agent, &mut env)
        .unwrap();
    assert_eq!(result.episodes(), 20);

    let received: Vec<StepSnapshot> = rx.try_iter().collect();
    assert_eq!(received.len(), 8);
    assert_eq!(received[0].step, 0);
    assert!(matches!(received[0].detail, EnvironmentDetail::Dispatch { .. }));
}

#[test]
fn test_jsonl_snapshots_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshots.jsonl");
    let mut env = GridWorld::from_kind(EnvironmentKind::ForageGrid, Some(5));
    let mut agent = TdAgent::q_learning(env.num_states(), env.num_actions()).unwrap();
    let result = TrainingPipeline::new(TrainingConfig::default().with_episodes(3).with_seed(5))
        .with_observer(Box::new(JsonlObserver::new(&path).unwrap()))
        .run(&mut agent, &mut env)
        .unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), result.episode_lengths.iter().sum::<usize>() + 3);
    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["kind"], "forage");
    assert_eq!(first["position"], 0);
    assert_eq!(first["has_eaten"], false);
    let parsed: StepSnapshot = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(parsed.step, 1);
}

#[test]
fn test_training_result_json_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut env = HazardGrid::new();
    let mut agent = TdAgent::sarsa(env.num_states(), env.num_actions()).unwrap();
    let result = TrainingPipeline::new(TrainingConfig::default().with_episodes(12).with_seed(6))
        .run(&mut agent, &mut env)
        .unwrap();

    let json_path = dir.path().join("result.json");
    result.save(&json_path).unwrap();
    let loaded = TrainingResult::load(&json_path).unwrap();
    assert_eq!(loaded.agent, result.agent);
    assert_eq!(loaded.episode_rewards, result.episode_rewards);
    assert_eq!(loaded.episode_lengths, result.episode_lengths);
    for (a, b) in loaded.q_table.iter().flatten().zip(result.q_table.iter().flatten()) {
        assert!((a - b).abs() < 1e-9);
    }

    let csv_path = dir.path().join("rewards.csv");
    result.export_rewards(&csv_path).unwrap();
    let contents = fs::read_to_string(&csv_path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next().unwrap(), "episode,reward,length,rolling_mean");
    assert_eq!(lines.count(), 12);
}

#[test]
fn test_dispatch_benchmark_from_prepared_state() {
    let mut env = DispatchGrid::with_seed(0);
    let mut agent = TdAgent::q_learning(env.num_states(), env.num_actions()).unwrap();
    TrainingPipeline::new(TrainingConfig::default().with_episodes(10_000).with_seed(12))
        .run(&mut agent, &mut env)
        .unwrap();

    let mut evaluator =
        Evaluator::new(EvaluationConfig::default().with_max_steps(200).with_seed(12));
    let state = env.set_state(2, 2, 0, 3).unwrap();
    let outcome = evaluator.run_episode_from(&agent, &mut env, state).unwrap();
    assert!(outcome.success, "benchmark episode failed: {outcome:?}");
    assert!(outcome.total_reward > 0.0);
    assert!(outcome.steps <= 40, "{outcome:?}");
}
