//! End-to-end integration tests across all four crates.
//!
//! These tests exercise the full ceremony lifecycle:
//! draw (engine) -> choice session (session) -> store / publish / export
//! (publish plane).
//!
//! They verify that the planes work together in realistic scenarios:
//! automatic draws landing in storage, public verification of published
//! results, operator-driven choice ceremonies, and export artifacts that
//! agree with what was published.

use std::collections::HashMap;

use spotdraw_engine::{
    run_choice_lottery, run_general_lottery, run_sector_lottery, verify_result_root,
};
use spotdraw_publish::{
    ExportFormat, MemoryPublisher, MemoryStore, ResultPublisher, SessionStore, export_document,
};
use spotdraw_session::ChoiceSession;
use spotdraw_types::{
    BuildingId, DrawOptions, ParkingSpot, Participant, ParticipantId, PriorityTier, Sector,
    SessionState,
};

fn building() -> BuildingId {
    BuildingId::new("edif-aurora")
}

fn units(names: &[&str]) -> Vec<Participant> {
    names.iter().map(|n| Participant::dummy(n)).collect()
}

fn spots(codes: &[&str]) -> Vec<ParkingSpot> {
    codes.iter().map(|c| ParkingSpot::dummy(c)).collect()
}

#[test]
fn general_draw_store_publish_export() {
    let participants = units(&["101", "102", "103", "104"]);
    let garage = spots(&["G1-01", "G1-02", "G1-03"]);

    let session = run_general_lottery(
        &building(),
        &participants,
        garage.clone(),
        &DrawOptions::seeded(7),
    )
    .unwrap();
    assert_eq!(session.assigned_count(), 3);
    assert_eq!(session.unassigned_count(), 1);

    // Store.
    let mut store = MemoryStore::new();
    store.save_session(&session).unwrap();
    let loaded = store.load_session(&session.id).unwrap();
    assert_eq!(loaded, session);

    // Publish and verify as a public viewer would.
    let mut publisher = MemoryPublisher::new();
    publisher.publish_results(&building(), &session).unwrap();
    let public = publisher.fetch_published(&building()).unwrap();
    assert!(public.verify());
    assert!(verify_result_root(&public.results, &session.result_root));

    // Export both artifacts.
    let json = export_document(&session, &participants, &garage, ExportFormat::Json).unwrap();
    let csv = export_document(&session, &participants, &garage, ExportFormat::Csv).unwrap();
    assert_eq!(json.mime_type, "application/json");
    let csv_text = String::from_utf8(csv.bytes).unwrap();
    assert_eq!(csv_text.lines().count(), 1 + participants.len());
}

#[test]
fn replayed_draw_matches_published_root() {
    let participants = units(&["201", "202", "203"]);
    let garage = spots(&["A1", "A2", "A3"]);
    let options = DrawOptions::seeded(99);

    let first = run_general_lottery(&building(), &participants, garage.clone(), &options).unwrap();
    let mut publisher = MemoryPublisher::new();
    publisher.publish_results(&building(), &first).unwrap();

    // A skeptical resident reruns the draw from the recorded seed.
    let replay_options = DrawOptions::seeded(first.seed.unwrap());
    let replay = run_general_lottery(&building(), &participants, garage, &replay_options).unwrap();

    let public = publisher.fetch_published(&building()).unwrap();
    assert_eq!(replay.result_root, public.digest.result_root);
    assert_eq!(replay.results, public.results);
}

#[test]
fn sector_draw_lands_in_per_building_history() {
    let mut participants = units(&["301", "302", "303", "304"]);
    let sector_map: HashMap<ParticipantId, Sector> = participants
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, Sector::new(if i % 2 == 0 { "A" } else { "B" })))
        .collect();
    participants[0].priority = PriorityTier::Pcd;

    let garage = vec![
        ParkingSpot::dummy_in_sector("A1", "A"),
        ParkingSpot::dummy_in_sector("A2", "A"),
        ParkingSpot::dummy_in_sector("B1", "B"),
        ParkingSpot::dummy_in_sector("B2", "B"),
    ];

    let session = run_sector_lottery(
        &building(),
        &participants,
        garage,
        &sector_map,
        &DrawOptions::seeded(5),
    )
    .unwrap();
    assert_eq!(session.assigned_count(), 4);

    let mut store = MemoryStore::new();
    store.save_session(&session).unwrap();
    let history = store.load_sessions(&building()).unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].is_finalized());
}

#[test]
fn choice_ceremony_persists_snapshots_then_publishes() {
    let participants = units(&["401", "402", "403"]);
    let garage = spots(&["C1", "C2", "C3"]);
    let spot_ids: Vec<_> = garage.iter().map(|s| s.id).collect();

    let drawn = run_choice_lottery(&building(), &participants, &DrawOptions::seeded(11)).unwrap();
    let mut store = MemoryStore::new();
    store.save_session(&drawn).unwrap();

    let mut ceremony = ChoiceSession::new(drawn, participants.clone(), garage.clone()).unwrap();
    ceremony.start().unwrap();

    // First pick, snapshot persisted mid-ceremony.
    let first = ceremony.current_turn().unwrap();
    ceremony.pick_spot(first, spot_ids[0]).unwrap();
    store.save_session(ceremony.session()).unwrap();
    assert_eq!(
        store
            .load_session(&ceremony.session().id)
            .unwrap()
            .assigned_count(),
        1
    );

    // Remaining turns: one skip, one pick, then the session self-completes.
    ceremony.skip_turn().unwrap();
    let third = ceremony.current_turn().unwrap();
    ceremony.pick_spot(third, spot_ids[1]).unwrap();
    assert_eq!(ceremony.state(), SessionState::Completed);

    let finished = ceremony.into_session();
    store.save_session(&finished).unwrap();

    // Finalized history is locked.
    let mut tampered = finished.clone();
    tampered.results[0].spots.clear();
    assert!(store.save_session(&tampered).is_err());

    // Publish and export the finished ceremony.
    let mut publisher = MemoryPublisher::new();
    publisher.publish_results(&building(), &finished).unwrap();
    assert!(publisher.fetch_published(&building()).unwrap().verify());

    let doc = export_document(&finished, &participants, &garage, ExportFormat::Csv).unwrap();
    let text = String::from_utf8(doc.bytes).unwrap();
    assert_eq!(text.lines().filter(|l| l.ends_with(",ASSIGNED")).count(), 2);
    assert_eq!(
        text.lines().filter(|l| l.ends_with(",UNASSIGNED")).count(),
        1
    );
}

#[test]
fn republished_correction_supersedes_original() {
    let participants = units(&["501", "502"]);
    let garage = spots(&["D1", "D2"]);

    let first =
        run_general_lottery(&building(), &participants, garage.clone(), &DrawOptions::seeded(1))
            .unwrap();
    let second =
        run_general_lottery(&building(), &participants, garage, &DrawOptions::seeded(2)).unwrap();

    let mut store = MemoryStore::new();
    store.save_session(&first).unwrap();
    store.save_session(&second).unwrap();
    assert_eq!(store.load_sessions(&building()).unwrap().len(), 2);

    let mut publisher = MemoryPublisher::new();
    publisher.publish_results(&building(), &first).unwrap();
    publisher.publish_results(&building(), &second).unwrap();

    // Viewers see only the correction; history keeps both.
    let public = publisher.fetch_published(&building()).unwrap();
    assert_eq!(public.digest.session_id, second.id);
    assert!(public.verify());
}
