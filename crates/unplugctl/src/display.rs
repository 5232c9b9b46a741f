//! Terminal rendering for unplugctl: stat blocks, XP bars, badge strips.

use owo_colors::OwoColorize;
use unplug_core::{levels, ProgressionEngine, ProgressionEvent};

/// ASCII progress bar, `[=====-----]` style.
pub fn progress_bar(percent: u8, width: usize) -> String {
    let filled = (percent as usize * width) / 100;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), "-".repeat(empty))
}

fn print_kv(key: &str, value: &str) {
    println!("  {:18} {}", key.dimmed(), value);
}

pub fn print_stats(engine: &ProgressionEngine) {
    let profile = engine.profile();
    let info = levels::info_for(profile.level);

    println!();
    println!("{}", format!("Level {} - {} {}", info.level, info.title, info.badge).bold());
    println!(
        "  {} {}%  ({} XP, {} to next level)",
        progress_bar(engine.level_progress(), 24),
        engine.level_progress(),
        profile.total_xp,
        engine.xp_for_next_level()
    );
    println!();

    print_kv("current_streak", &format!("{} days", profile.current_streak));
    print_kv("longest_streak", &format!("{} days", profile.longest_streak));
    print_kv("offline_hours", &format!("{:.1}", profile.total_offline_hours()));
    print_kv("sessions", &profile.total_sessions.to_string());
    print_kv(
        "achievements",
        &format!("{}/{}", profile.unlocked_count(), profile.achievements.len()),
    );

    let weekly = engine.weekly_stats();
    println!();
    println!("{}", "Last 7 days:".bold());
    print_kv("offline_minutes", &weekly.offline_minutes.to_string());
    print_kv("xp_earned", &weekly.xp_earned.to_string());
    print_kv("goal_met_days", &format!("{}/7", weekly.goal_met_days));
    print_kv("sessions", &weekly.sessions.to_string());
    println!();
}

pub fn print_achievements(engine: &ProgressionEngine) {
    println!();
    for row in engine.achievement_progress() {
        let marker = if row.unlocked { "[x]".green().to_string() } else { "[ ]".dimmed().to_string() };
        println!(
            "{} {:28} {:10} {:10} {} {}%",
            marker,
            row.title,
            row.category,
            row.rarity,
            progress_bar(row.percent, 12),
            row.percent
        );
    }
    println!();
}

pub fn print_today(engine: &ProgressionEngine) {
    let today = engine.today_stats();
    println!(
        "Today: {} offline minutes, {} XP, {} session(s)",
        today.offline_minutes, today.xp_earned, today.session_count
    );
}

pub fn print_goals(engine: &ProgressionEngine) {
    println!();
    for goal in &engine.profile().session_goals {
        let progress = match goal.total_target_sessions {
            Some(cap) => format!("{}/{}", goal.completed_sessions, cap),
            None => goal.completed_sessions.to_string(),
        };
        println!(
            "  {}  {:32} {:>4} min  completed: {}",
            goal.id.to_string().dimmed(),
            goal.title,
            goal.target_minutes,
            progress
        );
    }
    println!();
}

pub fn print_events(events: Vec<ProgressionEvent>) {
    for event in events {
        match &event {
            ProgressionEvent::AchievementUnlocked { .. } => {
                println!("{}", event.summary().yellow());
            }
            ProgressionEvent::LevelUp { .. } | ProgressionEvent::ChainCompleted { .. } => {
                println!("{}", event.summary().green().bold());
            }
            ProgressionEvent::StreakMilestone { .. } => {
                println!("{}", event.summary().cyan());
            }
            ProgressionEvent::GoalCompleted { .. }
            | ProgressionEvent::GoalSeriesCompleted { .. } => {
                println!("{}", event.summary());
            }
            ProgressionEvent::ProfileChanged { .. } => {}
        }
    }
}
