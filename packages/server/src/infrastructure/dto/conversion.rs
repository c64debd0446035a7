//! Conversion logic between domain entities and DTOs.

use crate::domain::{ParticipantRecord, Room};
use crate::infrastructure::presence::PeerSnapshot;

use super::http::{ParticipantDto, RoomDetailDto, RoomSummaryDto};
use super::websocket::PeerDto;

impl From<&PeerSnapshot> for PeerDto {
    fn from(peer: &PeerSnapshot) -> Self {
        Self {
            connection_id: peer.connection,
            user_id: peer.user.value(),
            role: peer.role,
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code.as_str().to_string(),
            label: room.label.clone(),
            application_id: room.application.value(),
            scheduled_time: room.scheduled_time.to_rfc3339(),
            duration_minutes: room.duration_minutes,
            status: room.status,
        }
    }
}

impl From<&ParticipantRecord> for ParticipantDto {
    fn from(participant: &ParticipantRecord) -> Self {
        Self {
            user_id: participant.user.value(),
            role: participant.role,
            joined_at: participant.joined_at.map(|t| t.to_rfc3339()),
            left_at: participant.left_at.map(|t| t.to_rfc3339()),
            is_active: participant.is_active,
        }
    }
}

/// Room plus its participant rows and live-connection count.
pub fn room_detail_dto(
    room: &Room,
    participants: &[ParticipantRecord],
    live_connections: usize,
) -> RoomDetailDto {
    RoomDetailDto {
        code: room.code.as_str().to_string(),
        label: room.label.clone(),
        application_id: room.application.value(),
        scheduled_time: room.scheduled_time.to_rfc3339(),
        duration_minutes: room.duration_minutes,
        status: room.status,
        created_by: room.created_by.value(),
        created_at: room.created_at.to_rfc3339(),
        started_at: room.started_at.map(|t| t.to_rfc3339()),
        ended_at: room.ended_at.map(|t| t.to_rfc3339()),
        participants: participants.iter().map(ParticipantDto::from).collect(),
        live_connections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationId, Role, RoomCode, RoomStatus, Timestamp, UserId};

    fn sample_room() -> Room {
        Room {
            code: RoomCode::new("INT91700000000000".to_string()).unwrap(),
            label: "Interview - Platform Engineer".to_string(),
            application: ApplicationId::new(9),
            scheduled_time: Timestamp::new(1672531200000),
            duration_minutes: 45,
            status: RoomStatus::Scheduled,
            created_by: UserId::new(3),
            created_at: Timestamp::new(1672444800000),
            started_at: None,
            ended_at: None,
        }
    }

    #[test]
    fn room_summary_carries_rfc3339_schedule() {
        let dto = RoomSummaryDto::from(&sample_room());

        assert_eq!(dto.code, "INT91700000000000");
        assert!(dto.scheduled_time.starts_with("2023-01-01T00:00:00"));
        assert_eq!(dto.status, RoomStatus::Scheduled);
    }

    #[test]
    fn room_detail_includes_participants_and_live_count() {
        let room = sample_room();
        let participants = vec![
            ParticipantRecord::new(room.code.clone(), UserId::new(1), Role::Candidate),
            ParticipantRecord::new(room.code.clone(), UserId::new(2), Role::Interviewer),
        ];

        let dto = room_detail_dto(&room, &participants, 1);

        assert_eq!(dto.participants.len(), 2);
        assert_eq!(dto.participants[0].role, Role::Candidate);
        assert_eq!(dto.live_connections, 1);
        assert_eq!(dto.started_at, None);
    }
}
