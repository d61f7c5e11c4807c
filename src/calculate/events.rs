//! Dashboard event detection.
//!
//! Scans each player's and team's full history for notable patterns in the
//! current streak and ranks them by salience.

use serde::Serialize;

use super::{
    chronological, comeback_depth, current_streak, outcomes, player_history, player_tallies,
    rank_by_win_rate, rank_of, team_history, team_tallies, CurrentStreak,
};
use crate::models::{MatchRecord, PlayerId, TeamKey, Tally, ROSTER};

/// Shortest streak that produces an event.
pub const MIN_STREAK: u32 = 3;

/// Streak length at which streak events use the escalated title.
pub const ESCALATED_STREAK: u32 = 5;

/// Losses right before the latest win needed for a comeback.
pub const COMEBACK_MIN_LOSSES: u32 = 5;

/// Games a player needs before rank-based events apply.
pub const MIN_GAMES_FOR_RANKED_EVENTS: u32 = 5;

const COMEBACK_PRIORITY: u32 = 1000;
const RANKED_STREAK_PRIORITY: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    WinStreak,
    LoseStreak,
    Comeback,
    DarkHorse,
    FallFromGrace,
    TeamWinStreak,
    TeamLoseStreak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum EventSubject {
    Player(PlayerId),
    Team(TeamKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardEvent {
    pub kind: EventKind,
    pub subject: EventSubject,
    pub priority: u32,
    /// Streak length, or loss count for a comeback
    pub streak: u32,
    pub title: String,
    pub message: String,
}

/// Every qualifying event, highest priority first. Equal priorities keep
/// roster order for players, then team order.
pub fn detect_events(matches: &[MatchRecord]) -> Vec<DashboardEvent> {
    let sorted = chronological(matches);
    let tallies = player_tallies(sorted.iter().copied());
    let ranking = rank_by_win_rate(tallies.iter().map(|(p, t)| (*p, *t)));

    let mut events = Vec::new();

    for player in ROSTER {
        let history = outcomes(&player_history(player, &sorted));
        let tally = tallies.get(&player).copied().unwrap_or_default();
        let rank = rank_of(&ranking, &player).unwrap_or(ROSTER.len() as u32);

        let depth = comeback_depth(&history);
        if depth >= COMEBACK_MIN_LOSSES {
            events.push(comeback_event(player, depth));
        }

        events.extend(player_streak_events(
            player,
            current_streak(&history),
            rank,
            tally,
        ));
    }

    for team in team_tallies(sorted.iter().copied()).into_keys() {
        let history = outcomes(&team_history(team, &sorted));
        if let Some(event) = team_streak_event(team, current_streak(&history)) {
            events.push(event);
        }
    }

    events.sort_by(|a, b| b.priority.cmp(&a.priority));
    events
}

/// The first `limit` events of an already ordered list.
pub fn top_events(mut events: Vec<DashboardEvent>, limit: usize) -> Vec<DashboardEvent> {
    events.truncate(limit);
    events
}

fn comeback_event(player: PlayerId, depth: u32) -> DashboardEvent {
    DashboardEvent {
        kind: EventKind::Comeback,
        subject: EventSubject::Player(player),
        priority: COMEBACK_PRIORITY + depth,
        streak: depth,
        title: "역전을 보여주세요".to_string(),
        message: format!(
            "{}님, {}연패 후 승리! 반전의 시작인가?",
            player.display_name(),
            depth
        ),
    }
}

/// The plain streak event for a streak of three or more, preceded by a
/// ranked event when a top-two player is losing or a lower player is winning.
fn player_streak_events(
    player: PlayerId,
    streak: CurrentStreak,
    rank: u32,
    tally: Tally,
) -> Vec<DashboardEvent> {
    if streak.length < MIN_STREAK {
        return Vec::new();
    }

    let name = player.display_name();
    let n = streak.length;
    let ranked = tally.total >= MIN_GAMES_FOR_RANKED_EVENTS;
    let rate = tally.win_rate();
    let event = |kind, priority, title: &str, message| DashboardEvent {
        kind,
        subject: EventSubject::Player(player),
        priority,
        streak: n,
        title: title.to_string(),
        message,
    };

    let mut events = Vec::with_capacity(2);
    match (streak.is_win, ranked) {
        (false, true) if rank <= 2 => events.push(event(
            EventKind::FallFromGrace,
            RANKED_STREAK_PRIORITY + n,
            "여왕의 몰락",
            format!("{name}님, 승률 {rate:.1}%에서 {n}연패 중..."),
        )),
        (true, true) if rank >= 3 => events.push(event(
            EventKind::DarkHorse,
            RANKED_STREAK_PRIORITY + n,
            "파죽지세!",
            format!("{name}님, 승률 {rate:.1}%에서 {n}연승 돌파!"),
        )),
        _ => {}
    }

    events.push(if streak.is_win {
        event(
            EventKind::WinStreak,
            n,
            if n >= ESCALATED_STREAK {
                "불멸의 연승"
            } else {
                "연승 행진"
            },
            format!("{name}님, {n}연승 중!"),
        )
    } else {
        event(
            EventKind::LoseStreak,
            n,
            if n >= ESCALATED_STREAK {
                "절망의 연패"
            } else {
                "연패의 늪"
            },
            format!("{name}님, {n}연패 중... 힘내세요!"),
        )
    });
    events
}

fn team_streak_event(team: TeamKey, streak: CurrentStreak) -> Option<DashboardEvent> {
    if streak.length < MIN_STREAK {
        return None;
    }

    let name = team.display_name();
    let n = streak.length;
    let (kind, title, message) = if streak.is_win {
        (
            EventKind::TeamWinStreak,
            "환상의 호흡",
            format!("{name} 팀, {n}연승 중!"),
        )
    } else {
        (
            EventKind::TeamLoseStreak,
            "삐걱이는 호흡",
            format!("{name} 팀, {n}연패 중..."),
        )
    };

    Some(DashboardEvent {
        kind,
        subject: EventSubject::Team(team),
        priority: n,
        streak: n,
        title: title.to_string(),
        message,
    })
}
