// Scanning a simulated matrix.

mod common;

use anyhow::Result;
use keymatrix::{
    ConfigError, KeyDef, KeyId, KeyMap, Keyboard, Line, Matrix, Polarity, ScanConfig, ScanError,
};

use common::{
    board, id, keymap, lines, matrix, scan_of, PinFault, RecordingDelay, DRIVE, SENSE,
};

fn config(polarity: Polarity) -> ScanConfig {
    ScanConfig {
        polarity,
        ..ScanConfig::default()
    }
}

#[test]
fn idle_scan_is_empty() -> Result<()> {
    common::init();
    let map = keymap();
    let b = board(Polarity::ActiveLow);
    let mut m = matrix(&b, &config(Polarity::ActiveLow));

    let result = m.scan(&map, &mut RecordingDelay::default())?;
    assert!(result.is_empty());
    assert!(b.borrow().active.is_empty());
    Ok(())
}

#[test]
fn closed_keys_found() -> Result<()> {
    common::init();
    let map = keymap();
    let b = board(Polarity::ActiveLow);
    let mut m = matrix(&b, &config(Polarity::ActiveLow));

    b.borrow_mut().press(0, 10);
    b.borrow_mut().press(1, 10);
    b.borrow_mut().press(2, 11);
    let result = m.scan(&map, &mut RecordingDelay::default())?;
    assert_eq!(result, scan_of(&map, &["a", "b", "Fn"]));

    b.borrow_mut().release(1, 10);
    let result = m.scan(&map, &mut RecordingDelay::default())?;
    assert_eq!(result, scan_of(&map, &["a", "Fn"]));
    Ok(())
}

#[test]
fn unmapped_closure_reported() -> Result<()> {
    common::init();
    let map = keymap();
    let b = board(Polarity::ActiveLow);
    let mut m = matrix(&b, &config(Polarity::ActiveLow));

    b.borrow_mut().press(2, 10);
    b.borrow_mut().press(1, 11);
    let result = m.scan(&map, &mut RecordingDelay::default())?;

    assert_eq!(result.len(), 2);
    assert!(result.contains(&id(&map, "c")));
    assert!(result.contains(&KeyId::Unmapped(Line(2), Line(10))));
    Ok(())
}

#[test]
fn one_drive_line_at_a_time() -> Result<()> {
    let map = keymap();

    for polarity in [Polarity::ActiveLow, Polarity::ActiveHigh] {
        let b = board(polarity);
        let mut m = matrix(&b, &config(polarity));
        for &d in &DRIVE {
            for &s in &SENSE {
                b.borrow_mut().press(d, s);
            }
        }

        let result = m.scan(&map, &mut RecordingDelay::default())?;
        assert_eq!(result.len(), DRIVE.len() * SENSE.len());
        assert_eq!(b.borrow().peak_active, 1);
        assert!(b.borrow().active.is_empty());
    }
    Ok(())
}

#[test]
fn polarity_sets_levels() -> Result<()> {
    let map = keymap();

    let b = board(Polarity::ActiveHigh);
    let mut m = matrix(&b, &config(Polarity::ActiveHigh));
    b.borrow_mut().press(0, 11);
    let result = m.scan(&map, &mut RecordingDelay::default())?;
    assert_eq!(result, scan_of(&map, &["Lshift"]));

    // All lines are first parked low, then each is raised and lowered.
    let writes = b.borrow().writes.clone();
    assert_eq!(&writes[..3], &[(0, false), (1, false), (2, false)]);
    assert_eq!(
        &writes[3..],
        &[(0, true), (0, false), (1, true), (1, false), (2, true), (2, false)]
    );

    let b = board(Polarity::ActiveLow);
    let mut m = matrix(&b, &config(Polarity::ActiveLow));
    m.scan(&map, &mut RecordingDelay::default())?;
    let writes = b.borrow().writes.clone();
    assert_eq!(&writes[..3], &[(0, true), (1, true), (2, true)]);
    assert_eq!(&writes[3..5], &[(0, false), (0, true)]);
    Ok(())
}

#[test]
fn settle_before_every_sample() -> Result<()> {
    let map = keymap();
    let b = board(Polarity::ActiveLow);
    let cfg = ScanConfig {
        settle_us: 250,
        ..ScanConfig::default()
    };
    let mut m = matrix(&b, &cfg);

    let mut delay = RecordingDelay::default();
    m.scan(&map, &mut delay)?;
    // Once after parking everything, then once per drive line.
    assert_eq!(delay.calls, vec![250; DRIVE.len() + 1]);
    Ok(())
}

#[test]
fn sense_failure_releases_drive() {
    common::init();
    let map = keymap();
    let b = board(Polarity::ActiveLow);
    let mut m = matrix(&b, &config(Polarity::ActiveLow));

    b.borrow_mut().press(0, 10);
    b.borrow_mut().fail_sense = Some(11);
    let err = m.scan(&map, &mut RecordingDelay::default()).err();
    assert_eq!(
        err,
        Some(ScanError::Sense {
            line: Line(11),
            error: PinFault(11),
        })
    );
    assert!(b.borrow().active.is_empty());

    // The next scan works once the fault clears.
    b.borrow_mut().fail_sense = None;
    let result = m.scan(&map, &mut RecordingDelay::default()).ok();
    assert_eq!(result, Some(scan_of(&map, &["a"])));
}

#[test]
fn drive_failure() {
    let map = keymap();
    let b = board(Polarity::ActiveLow);
    let mut m = matrix(&b, &config(Polarity::ActiveLow));

    b.borrow_mut().fail_drive = Some(1);
    match m.scan(&map, &mut RecordingDelay::default()) {
        Err(e) => {
            assert_eq!(e.line(), Line(1));
            assert!(matches!(e, ScanError::Drive { .. }));
        }
        Ok(r) => panic!("scan succeeded: {:?}", r),
    }
}

#[test]
fn line_validation() {
    let cfg = ScanConfig::default();
    let b = board(Polarity::ActiveLow);

    let (drive, sense) = lines(&b, &[], &SENSE);
    assert!(matches!(Matrix::new(drive, sense, &cfg), Err(ConfigError::NoDriveLines)));

    let (drive, sense) = lines(&b, &DRIVE, &[]);
    assert!(matches!(Matrix::new(drive, sense, &cfg), Err(ConfigError::NoSenseLines)));

    let (drive, sense) = lines(&b, &[0, 1, 0], &SENSE);
    assert!(matches!(
        Matrix::new(drive, sense, &cfg),
        Err(ConfigError::LineRoleConflict(Line(0)))
    ));

    let (drive, sense) = lines(&b, &DRIVE, &[10, 2]);
    assert!(matches!(
        Matrix::new(drive, sense, &cfg),
        Err(ConfigError::LineRoleConflict(Line(2)))
    ));
}

#[test]
fn keymap_must_fit_matrix() -> Result<()> {
    let b = board(Polarity::ActiveLow);
    let m = matrix(&b, &ScanConfig::default());

    m.check_keymap(&keymap())?;

    let stray = KeyMap::build(&[KeyDef::new(10, 7, "far", Keyboard::F)])?;
    assert_eq!(
        m.check_keymap(&stray).err(),
        Some(ConfigError::UnconfiguredLine {
            key: "far",
            line: Line(7),
        })
    );

    // Both ends on the drive side can never close.
    let same_side = KeyMap::build(&[KeyDef::new(0, 1, "odd", Keyboard::G)])?;
    assert!(matches!(
        m.check_keymap(&same_side),
        Err(ConfigError::UnconfiguredLine { key: "odd", .. })
    ));
    Ok(())
}
