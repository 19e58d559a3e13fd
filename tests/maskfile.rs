//! Mask files going through the file system

use mask_kinematics::{
    maskfile::ReaderState, EventRecord, Header, MaskError, MaskFileReader, MaskFileWriter,
    NucleusRecord, ReactionType,
};

use std::{f64::consts::PI, fs, io::Write};

/// Three known sub-records of a 8Be -> 4He + 4He decay
fn decay_event() -> EventRecord {
    vec![
        NucleusRecord {
            z: 4,
            a: 8,
            detected: false,
            energy: 7454.85,
            kinetic_energy: 0.,
            momentum: 0.,
            theta: 0.,
            phi: 0.,
        },
        NucleusRecord {
            z: 2,
            a: 4,
            detected: true,
            energy: 3727.425,
            kinetic_energy: 0.046,
            momentum: 18.52,
            theta: 1.1,
            phi: 0.3,
        },
        NucleusRecord {
            z: 2,
            a: 4,
            detected: false,
            energy: 3727.425,
            kinetic_energy: 0.046,
            momentum: 18.52,
            theta: PI - 1.1,
            phi: PI + 0.3,
        },
    ]
}

/// Serialize an event by hand, independently of the library's encoder
fn raw_bytes(sample_count: i32, code: i32, event: &EventRecord) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&sample_count.to_le_bytes());
    bytes.extend_from_slice(&code.to_le_bytes());
    for record in event {
        bytes.extend_from_slice(&record.z.to_le_bytes());
        bytes.extend_from_slice(&record.a.to_le_bytes());
        bytes.push(record.detected as u8);
        for value in [
            record.energy,
            record.kinetic_energy,
            record.momentum,
            record.theta,
            record.phi,
        ] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
    }
    bytes
}

#[test]
fn hand_written_file_reads_back_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("decay.mask");
    let event = decay_event();
    fs::write(&path, raw_bytes(1, 0, &event)).unwrap();

    let mut reader = MaskFileReader::open(&path).unwrap();
    let header = reader.read_header().unwrap();
    assert_eq!(header, Header::new(1, ReactionType::Decay));
    assert_eq!(header.nuclei_count(), 3);

    let read_back = reader.read_data().unwrap().unwrap();
    assert_eq!(read_back, event);
    for (got, expected) in read_back.iter().zip(&event) {
        assert_eq!(got.theta.to_bits(), expected.theta.to_bits());
        assert_eq!(got.energy.to_bits(), expected.energy.to_bits());
    }

    // The file ends right after a complete event
    assert!(reader.read_data().unwrap().is_none());
    assert_eq!(reader.state(), ReaderState::Exhausted);
    assert_eq!(reader.events_read(), 1);
}

#[test]
fn writer_output_matches_the_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("written.mask");
    let event = decay_event();

    let mut writer = MaskFileWriter::create(&path, Header::new(1, ReactionType::Decay)).unwrap();
    writer.write_event(&event).unwrap();
    drop(writer.finish().unwrap());

    let bytes = fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8 + 3 * 49);
    assert_eq!(bytes, raw_bytes(1, 0, &event));
}

#[test]
fn truncated_file_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("truncated.mask");
    let mut bytes = raw_bytes(1, 0, &decay_event());
    bytes.truncate(8 + 20);
    fs::File::create(&path).unwrap().write_all(&bytes).unwrap();

    let mut reader = MaskFileReader::open(&path).unwrap();
    reader.read_header().unwrap();
    assert!(matches!(reader.read_data(), Err(MaskError::Format(_))));
    assert_eq!(reader.state(), ReaderState::Failed);
    assert!(matches!(reader.read_data(), Err(MaskError::State(_))));
}

#[test]
fn every_event_of_a_longer_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("many.mask");
    let event = vec![NucleusRecord::default(); 8];

    let mut writer =
        MaskFileWriter::create(&path, Header::new(5, ReactionType::ThreeStep)).unwrap();
    for _ in 0..5 {
        writer.write_event(&event).unwrap();
    }
    assert_eq!(writer.events_written(), 5);
    writer.finish().unwrap();

    let mut reader = MaskFileReader::open(&path).unwrap();
    assert_eq!(reader.read_header().unwrap().reaction_type, ReactionType::ThreeStep);
    let events = reader.by_ref().collect::<Result<Vec<_>, _>>().unwrap();
    assert_eq!(events.len(), 5);
    assert!(events.iter().all(|e| e == &event));
    reader.close();
    assert_eq!(reader.state(), ReaderState::Closed);
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nowhere.mask");
    match MaskFileReader::open(&path) {
        Err(MaskError::File { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected a file error, got {:?}", other.map(|r| r.state())),
    }
}
