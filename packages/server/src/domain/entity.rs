//! Domain entities: rooms, durable participant records, interview feedback
//! and the shared editor snapshot.

use serde::{Deserialize, Serialize};

use super::value_object::{ApplicationId, RoomCode, Timestamp, UserId};

/// Lifecycle status of an interview room.
///
/// `Scheduled` is the initial state; `Completed` and `Cancelled` are
/// terminal. Presence tracking works independently of status: a room may
/// host live connections while still `Scheduled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

impl RoomStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RoomStatus::Completed | RoomStatus::Cancelled)
    }

    /// Whether `self -> target` is a legal edge of the status machine.
    pub fn can_transition(self, target: RoomStatus) -> bool {
        use RoomStatus::*;
        matches!(
            (self, target),
            (Scheduled, Active) | (Scheduled, Cancelled) | (Active, Completed) | (Active, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Scheduled => "scheduled",
            RoomStatus::Active => "active",
            RoomStatus::Completed => "completed",
            RoomStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for RoomStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(RoomStatus::Scheduled),
            "active" => Ok(RoomStatus::Active),
            "completed" => Ok(RoomStatus::Completed),
            "cancelled" => Ok(RoomStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// Why a requested status change was refused.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum TransitionViolation {
    /// Mutation of a completed room. Completed rooms are a durable record
    /// of a held interview and never change again.
    #[error("room is completed and can no longer be mutated")]
    CompletedRoomProtected,
    #[error("illegal status transition {from:?} -> {to:?}")]
    IllegalEdge { from: RoomStatus, to: RoomStatus },
}

/// Role a participant holds inside a room. Exactly one candidate per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Candidate,
    Interviewer,
    Observer,
}

/// A durably scheduled interview session.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub code: RoomCode,
    pub label: String,
    pub application: ApplicationId,
    pub scheduled_time: Timestamp,
    pub duration_minutes: u32,
    pub status: RoomStatus,
    pub created_by: UserId,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
}

impl Room {
    /// Apply a status transition, stamping `started_at`/`ended_at`.
    ///
    /// Cancelling a completed room is refused with
    /// [`TransitionViolation::CompletedRoomProtected`]; every other illegal
    /// edge is an [`TransitionViolation::IllegalEdge`]. The room is left
    /// unchanged on error.
    pub fn transition(&mut self, target: RoomStatus, at: Timestamp) -> Result<(), TransitionViolation> {
        if self.status == RoomStatus::Completed && target == RoomStatus::Cancelled {
            return Err(TransitionViolation::CompletedRoomProtected);
        }
        if !self.status.can_transition(target) {
            return Err(TransitionViolation::IllegalEdge {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        match target {
            RoomStatus::Active => self.started_at = Some(at),
            RoomStatus::Completed | RoomStatus::Cancelled => self.ended_at = Some(at),
            RoomStatus::Scheduled => {}
        }
        Ok(())
    }
}

/// Durable association between a room and an authorized user.
///
/// Created when the room is scheduled, updated on every live join/leave,
/// never deleted by live traffic.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRecord {
    pub room: RoomCode,
    pub user: UserId,
    pub role: Role,
    pub joined_at: Option<Timestamp>,
    pub left_at: Option<Timestamp>,
    pub is_active: bool,
}

impl ParticipantRecord {
    pub fn new(room: RoomCode, user: UserId, role: Role) -> Self {
        Self {
            room,
            user,
            role,
            joined_at: None,
            left_at: None,
            is_active: false,
        }
    }
}

/// Overall interview rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackRating {
    Excellent,
    Good,
    Average,
    Poor,
}

/// Hiring recommendation attached to interview feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HireRecommendation {
    Hire,
    Maybe,
    Reject,
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum InvalidFeedback {
    #[error("score {0} is out of range (expected 0..=10)")]
    ScoreOutOfRange(u8),
}

/// Durable feedback row an interviewer files against a room.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackEntry {
    pub room: RoomCode,
    pub interviewer: UserId,
    pub candidate: UserId,
    pub technical_score: u8,
    pub communication_score: u8,
    pub problem_solving_score: u8,
    pub overall_rating: FeedbackRating,
    pub notes: String,
    pub recommendation: HireRecommendation,
    pub created_at: Timestamp,
}

impl FeedbackEntry {
    pub const MAX_SCORE: u8 = 10;

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        room: RoomCode,
        interviewer: UserId,
        candidate: UserId,
        technical_score: u8,
        communication_score: u8,
        problem_solving_score: u8,
        overall_rating: FeedbackRating,
        notes: String,
        recommendation: HireRecommendation,
        created_at: Timestamp,
    ) -> Result<Self, InvalidFeedback> {
        for score in [technical_score, communication_score, problem_solving_score] {
            if score > Self::MAX_SCORE {
                return Err(InvalidFeedback::ScoreOutOfRange(score));
            }
        }
        Ok(Self {
            room,
            interviewer,
            candidate,
            technical_score,
            communication_score,
            problem_solving_score,
            overall_rating,
            notes,
            recommendation,
            created_at,
        })
    }
}

/// The current shared editor content of a room.
///
/// Single mutable snapshot per room, last write wins. Lives only in memory
/// and is discarded once the room has been empty for a grace period.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    pub content: String,
    pub language: String,
    pub updated_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled_room() -> Room {
        Room {
            code: RoomCode::new("INT11000".to_string()).unwrap(),
            label: "Interview - Backend Engineer".to_string(),
            application: ApplicationId::new(1),
            scheduled_time: Timestamp::new(2_000),
            duration_minutes: 60,
            status: RoomStatus::Scheduled,
            created_by: UserId::new(9),
            created_at: Timestamp::new(1_000),
            started_at: None,
            ended_at: None,
        }
    }

    #[test]
    fn legal_edges_are_exactly_the_four_allowed_ones() {
        use RoomStatus::*;
        let all = [Scheduled, Active, Completed, Cancelled];

        for from in all {
            for to in all {
                let legal = matches!(
                    (from, to),
                    (Scheduled, Active)
                        | (Scheduled, Cancelled)
                        | (Active, Completed)
                        | (Active, Cancelled)
                );
                assert_eq!(from.can_transition(to), legal, "{from:?} -> {to:?}");
            }
        }
    }

    #[test]
    fn activating_a_room_stamps_started_at() {
        let mut room = scheduled_room();

        room.transition(RoomStatus::Active, Timestamp::new(5_000)).unwrap();

        assert_eq!(room.status, RoomStatus::Active);
        assert_eq!(room.started_at, Some(Timestamp::new(5_000)));
        assert_eq!(room.ended_at, None);
    }

    #[test]
    fn completing_a_room_stamps_ended_at() {
        let mut room = scheduled_room();
        room.transition(RoomStatus::Active, Timestamp::new(5_000)).unwrap();

        room.transition(RoomStatus::Completed, Timestamp::new(9_000)).unwrap();

        assert_eq!(room.status, RoomStatus::Completed);
        assert_eq!(room.ended_at, Some(Timestamp::new(9_000)));
    }

    #[test]
    fn completed_room_never_returns_to_an_earlier_state() {
        let mut room = scheduled_room();
        room.transition(RoomStatus::Active, Timestamp::new(5_000)).unwrap();
        room.transition(RoomStatus::Completed, Timestamp::new(9_000)).unwrap();

        let err = room.transition(RoomStatus::Active, Timestamp::new(10_000)).unwrap_err();

        assert_eq!(
            err,
            TransitionViolation::IllegalEdge {
                from: RoomStatus::Completed,
                to: RoomStatus::Active,
            }
        );
        assert_eq!(room.status, RoomStatus::Completed);
    }

    #[test]
    fn cancelling_a_completed_room_is_refused_outright() {
        let mut room = scheduled_room();
        room.transition(RoomStatus::Active, Timestamp::new(5_000)).unwrap();
        room.transition(RoomStatus::Completed, Timestamp::new(9_000)).unwrap();

        let err = room.transition(RoomStatus::Cancelled, Timestamp::new(10_000)).unwrap_err();

        assert_eq!(err, TransitionViolation::CompletedRoomProtected);
    }

    #[test]
    fn cancelled_room_admits_no_further_transitions() {
        let mut room = scheduled_room();
        room.transition(RoomStatus::Cancelled, Timestamp::new(5_000)).unwrap();

        for target in [RoomStatus::Scheduled, RoomStatus::Active, RoomStatus::Completed] {
            assert!(room.transition(target, Timestamp::new(6_000)).is_err());
        }
        assert_eq!(room.status, RoomStatus::Cancelled);
    }

    #[test]
    fn feedback_rejects_out_of_range_scores() {
        let err = FeedbackEntry::new(
            RoomCode::new("INT11000".to_string()).unwrap(),
            UserId::new(2),
            UserId::new(1),
            11,
            5,
            5,
            FeedbackRating::Good,
            String::new(),
            HireRecommendation::Maybe,
            Timestamp::new(0),
        )
        .unwrap_err();

        assert_eq!(err, InvalidFeedback::ScoreOutOfRange(11));
    }

    #[test]
    fn status_round_trips_through_from_str() {
        for status in [
            RoomStatus::Scheduled,
            RoomStatus::Active,
            RoomStatus::Completed,
            RoomStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<RoomStatus>(), Ok(status));
        }
        assert!("archived".parse::<RoomStatus>().is_err());
    }
}
