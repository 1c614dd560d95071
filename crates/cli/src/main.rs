//! LearnPath CLI - cohort-aware learning resource recommendations.

mod resources;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use learnpath_cluster::{build_clusterer, ClusterConfig, ClusterMode, CohortClusterer};
use learnpath_core::{
    ClusterId, PreferredFormat, ProgressSnapshot, ScorePair, Student, StudentId, Subject,
};
use learnpath_progress::{
    analyze_subject, engagement_level, summarize, ProgressConfig, SessionEstimator, Trend,
};
use learnpath_storage::{load_reference_population, JsonStorage, Storage};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use resources::resources_for;

#[derive(Parser)]
#[command(name = "learnpath")]
#[command(about = "Cohort-aware learning resource recommendations", long_about = None)]
struct Cli {
    /// Directory holding student records
    #[arg(long, global = true, default_value = ".learnpath")]
    data_dir: PathBuf,

    /// Reference population dataset (CSV or JSON)
    #[arg(long, global = true, default_value = "data/Student_Performance.csv")]
    baseline: PathBuf,

    /// Cluster assignment strategy: fixed or refit
    #[arg(long, global = true, default_value = "fixed")]
    mode: ClusterMode,

    /// Seed for centroid initialization (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Number of k-means++ restarts
    #[arg(long, global = true, default_value = "10")]
    restarts: usize,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentCommand,
    },
    /// Record a new assessment and its cohort group
    Assess {
        /// Student ID
        student: String,
        /// Math score (0-100)
        #[arg(long)]
        math: f64,
        /// Reading score (0-100)
        #[arg(long)]
        reading: f64,
        /// Engagement (clicks) during the session
        #[arg(long, default_value = "300")]
        clicks: u32,
        /// Topic label
        #[arg(long, default_value = "General")]
        topic: String,
    },
    /// Analyze a student's progress trend
    Analyze {
        /// Student ID
        student: String,
        /// Target score for the goal projection
        #[arg(long, default_value = "90")]
        target: f64,
        /// Subject to track
        #[arg(long, default_value = "math")]
        subject: Subject,
        /// Clicks below which engagement counts as low
        #[arg(long, default_value = "200")]
        low_engagement: u32,
    },
    /// Recommend resources for a score pair
    Recommend {
        /// Math score (0-100)
        #[arg(long)]
        math: f64,
        /// Reading score (0-100)
        #[arg(long)]
        reading: f64,
    },
    /// Show a student's recorded history
    History {
        /// Student ID
        student: String,
    },
}

#[derive(Subcommand)]
enum StudentCommand {
    /// Add a student
    Add {
        /// Display name
        name: String,
        /// Interests (e.g. "ML, Math")
        #[arg(long, default_value = "")]
        interests: String,
        /// Preferred format: video, text or discussion
        #[arg(long, default_value = "video")]
        format: PreferredFormat,
    },
    /// List students
    List,
    /// Show a student's profile
    Show {
        /// Student ID
        id: String,
    },
    /// Remove a student and their history
    Remove {
        /// Student ID
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut storage = JsonStorage::new(&cli.data_dir)
        .await
        .with_context(|| format!("Failed to open data directory {}", cli.data_dir.display()))?;

    let cluster_config = ClusterConfig {
        seed: cli.seed,
        restarts: cli.restarts,
        ..Default::default()
    };

    match cli.command {
        Commands::Student { action } => run_student(&mut storage, action).await?,
        Commands::Assess { student, math, reading, clicks, topic } => {
            let student = require_student(&storage, &student).await?;
            let scores = score_pair(math, reading)?;
            let clusterer = load_clusterer(&cli.baseline, cli.mode, cluster_config).await?;
            let cluster = clusterer.assign(scores)?;
            warn_if_unstable(clusterer.as_ref());

            let snapshot = ProgressSnapshot::new(student.id, scores, clicks)
                .with_topic(topic)
                .with_cluster(cluster);
            storage.save_snapshot(&snapshot).await?;
            info!(student = %student.id, cluster = %cluster, "progress saved");

            println!("Progress saved for {} (cohort group {})", student.name, cluster);
            print_resources(cluster);
            if let Some(nudge) = engagement_level(&snapshot, &ProgressConfig::default()).nudge() {
                println!("{}", nudge);
            }
        }
        Commands::Analyze { student, target, subject, low_engagement } => {
            let student = require_student(&storage, &student).await?;
            let config = ProgressConfig::default()
                .with_subject(subject)
                .with_target(target)
                .with_engagement_threshold(low_engagement);
            let history = storage.list_snapshots(student.id).await?;
            for line in analysis_lines(&history, &config) {
                println!("{}", line);
            }
        }
        Commands::Recommend { math, reading } => {
            let scores = score_pair(math, reading)?;
            let clusterer = load_clusterer(&cli.baseline, cli.mode, cluster_config).await?;
            let cluster = clusterer.assign(scores)?;
            warn_if_unstable(clusterer.as_ref());
            println!("Cohort group: {}", cluster);
            print_resources(cluster);
        }
        Commands::History { student } => {
            let student = require_student(&storage, &student).await?;
            let history = storage.list_snapshots(student.id).await?;
            println!("History for {} ({} sessions)", student.name, history.len());
            for snapshot in &history {
                println!("  {}", format_snapshot_row(snapshot));
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_student(storage: &mut JsonStorage, action: StudentCommand) -> Result<()> {
    match action {
        StudentCommand::Add { name, interests, format } => {
            let student = Student::new(name)
                .with_interests(interests)
                .with_format(format);
            storage.save_student(&student).await?;
            println!("Added student: {} - {}", student.id, student.name);
        }
        StudentCommand::List => {
            let students = storage.list_students().await?;
            println!("Students ({})", students.len());
            for student in students {
                println!("  {} | {} | {}", student.id, student.preferred_format, student.name);
            }
        }
        StudentCommand::Show { id } => {
            let student = require_student(&*storage, &id).await?;
            let history = storage.list_snapshots(student.id).await?;
            println!("Student: {}", student.id);
            println!("  Name: {}", student.name);
            println!("  Interests: {}", student.interests);
            println!("  Preferred Format: {}", student.preferred_format);
            println!("  Sessions: {}", history.len());
            println!("  Created: {}", student.created_at);
        }
        StudentCommand::Remove { id } => {
            let student = require_student(&*storage, &id).await?;
            storage.delete_student(student.id).await?;
            println!("Removed student: {}", student.id);
        }
    }
    Ok(())
}

async fn require_student<S: Storage>(storage: &S, id: &str) -> Result<Student> {
    let student_id: StudentId = id
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid student ID: {}", id))?;
    storage
        .load_student(student_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Student not found: {}", id))
}

async fn load_clusterer(
    baseline: &Path,
    mode: ClusterMode,
    config: ClusterConfig,
) -> Result<Box<dyn CohortClusterer>> {
    let population = load_reference_population(baseline)
        .await
        .with_context(|| format!("Failed to load baseline {}", baseline.display()))?;
    let clusterer = build_clusterer(mode, population, config)
        .context("Failed to build cohort clusterer")?;
    Ok(clusterer)
}

fn warn_if_unstable(clusterer: &dyn CohortClusterer) {
    if let Some(notice) = unstable_ids_notice(clusterer.mode()) {
        warn!("{}", notice);
    }
}

fn unstable_ids_notice(mode: ClusterMode) -> Option<&'static str> {
    match mode {
        ClusterMode::Refit => Some("refit mode: group ids are not comparable across runs"),
        ClusterMode::Fixed => None,
    }
}

/// Scores entered at the command line must sit in `[0, 100]`.
fn score_pair(math: f64, reading: f64) -> Result<ScorePair> {
    for (name, value) in [("math", math), ("reading", reading)] {
        if !(0.0..=100.0).contains(&value) {
            anyhow::bail!("{} score must be between 0 and 100, got {}", name, value);
        }
    }
    Ok(ScorePair::new(math, reading))
}

fn analysis_lines(history: &[ProgressSnapshot], config: &ProgressConfig) -> Vec<String> {
    let mut lines = Vec::new();
    let report = analyze_subject(history, config.subject);
    lines.push(report.message());

    if report.trend != Trend::InsufficientHistory {
        let estimator = SessionEstimator::new(config.target_score);
        lines.push(estimator.estimate(&report).message(estimator.target()));
    }

    let summary = summarize(history, config.subject);
    if summary.sessions > 0 {
        lines.push(format!(
            "Sessions: {} | mean math {:.1} | mean reading {:.1} | best {} {:.1}",
            summary.sessions,
            summary.mean_math,
            summary.mean_reading,
            config.subject,
            summary.best.unwrap_or_default(),
        ));
    }

    if let Some(latest) = history.last() {
        if let Some(nudge) = engagement_level(latest, config).nudge() {
            lines.push(nudge.to_string());
        }
        if let Some(cluster) = latest.cluster {
            lines.push(format!("Last recorded cohort group: {}", cluster));
        }
    }

    lines
}

fn format_snapshot_row(snapshot: &ProgressSnapshot) -> String {
    let cluster = snapshot
        .cluster
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} | {} | math {} | reading {} | clicks {} | group {}",
        snapshot.timestamp.format("%Y-%m-%d %H:%M"),
        snapshot.topic,
        snapshot.scores.math,
        snapshot.scores.reading,
        snapshot.clicks,
        cluster,
    )
}

fn print_resources(cluster: ClusterId) {
    println!("Recommended resources:");
    for resource in resources_for(cluster) {
        println!("  {} - {}", resource.title, resource.url);
    }
}
