//! Copy, move, assignment and query semantics of flag handles.

use anyhow::Result;
use shared_flag::{FlagError, FlagHandle, SharedFlag, SharedFlagReader};
use std::time::Duration;

fn moved_away_flag() -> Result<SharedFlag> {
    let flag = SharedFlag::new();
    let _destination = flag.take()?;
    Ok(flag)
}

fn moved_away_reader() -> Result<SharedFlagReader> {
    let flag = SharedFlag::new();
    let reader = flag.reader()?;
    let _destination = reader.take()?;
    Ok(reader)
}

// ---------------------------------------------------------------------------
// Construction

#[test]
fn default_constructed_flags_are_independent() -> Result<()> {
    let first = SharedFlag::new();
    let second = SharedFlag::new();
    first.set()?;
    assert!(!second.get()?);
    Ok(())
}

#[test]
fn copy_shares_the_existing_state() -> Result<()> {
    let first = SharedFlag::new();
    let second = first.try_clone()?;
    first.set()?;
    assert!(second.get()?);
    assert!(first.same_state(&second)?);
    Ok(())
}

#[test]
fn copies_of_copies_share_the_same_state() -> Result<()> {
    let origin = SharedFlag::new();
    let copy = origin.try_clone()?;
    let reader = copy.reader()?;
    let reader_copy = reader.try_clone()?;

    assert!(reader_copy.same_state(&origin)?);
    assert_eq!(origin.get()?, reader_copy.get()?);
    copy.set()?;
    assert_eq!(origin.get()?, reader_copy.get()?);
    Ok(())
}

#[test]
fn copy_from_moved_away_source_fails() -> Result<()> {
    let flag = moved_away_flag()?;
    assert_eq!(flag.try_clone().unwrap_err(), FlagError::MovedAway);
    assert_eq!(flag.reader().unwrap_err(), FlagError::MovedAway);

    let reader = moved_away_reader()?;
    assert_eq!(
        SharedFlagReader::try_from_handle(&reader).unwrap_err(),
        FlagError::MovedAway
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Copy assignment

#[test]
fn copy_assignment_shares_the_existing_state() -> Result<()> {
    let first = SharedFlag::new();
    let second = SharedFlag::new();
    second.assign_from(&first)?;
    first.set()?;
    assert!(second.get()?);
    Ok(())
}

#[test]
fn copy_assignment_releases_the_previous_state() -> Result<()> {
    let first = SharedFlag::new();
    let second = SharedFlag::new();
    let witness = second.reader()?;

    second.assign_from(&first)?;
    second.set()?;
    assert!(first.get()?);
    assert!(!witness.get()?);
    assert!(!witness.same_state(&second)?);
    Ok(())
}

#[test]
fn copy_assignment_from_moved_away_source_fails_and_keeps_target() -> Result<()> {
    let source = moved_away_flag()?;
    let target = SharedFlag::new();
    let witness = target.try_clone()?;

    assert_eq!(target.assign_from(&source), Err(FlagError::MovedAway));
    assert!(target.valid());
    assert!(target.same_state(&witness)?);
    Ok(())
}

#[test]
fn reader_copy_assignment_accepts_flags_and_readers() -> Result<()> {
    let flag = SharedFlag::new();
    let other = SharedFlag::new();
    let reader = other.reader()?;
    let second_reader = flag.reader()?;

    reader.assign_from(&flag)?;
    assert!(reader.same_state(&flag)?);
    reader.assign_from(&other.reader()?)?;
    assert!(reader.same_state(&other)?);
    second_reader.assign_from(&reader)?;
    assert!(second_reader.same_state(&other)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Moves

#[test]
fn move_transfers_the_state() -> Result<()> {
    let first = SharedFlag::new();
    first.set()?;
    let second = first.take()?;
    assert!(second.get()?);
    Ok(())
}

#[test]
fn move_empties_the_source() -> Result<()> {
    let first = SharedFlag::new();
    let second = first.take()?;
    assert!(!first.valid());
    assert!(!second.get()?);
    assert_eq!(first.get(), Err(FlagError::MovedAway));
    Ok(())
}

#[test]
fn double_move_fails() -> Result<()> {
    let first = SharedFlag::new();
    let _second = first.take()?;
    assert_eq!(first.take().unwrap_err(), FlagError::MovedAway);
    Ok(())
}

#[test]
fn move_assignment_transfers_the_state() -> Result<()> {
    let first = SharedFlag::new();
    first.set()?;
    let second = SharedFlag::new();
    second.move_from(&first)?;
    assert!(second.get()?);
    assert!(!first.valid());
    Ok(())
}

#[test]
fn move_assignment_from_moved_away_source_fails_and_keeps_target() -> Result<()> {
    let source = moved_away_flag()?;
    let target = SharedFlag::new();
    let witness = target.reader()?;

    assert_eq!(target.move_from(&source), Err(FlagError::MovedAway));
    assert!(target.same_state(&witness)?);
    assert!(!source.valid());
    Ok(())
}

#[test]
fn native_move_keeps_the_state() -> Result<()> {
    let first = SharedFlag::new();
    let reader = first.reader()?;
    let second = first;
    second.set()?;
    assert!(reader.get()?);
    Ok(())
}

#[test]
fn moved_away_handle_can_be_revived() -> Result<()> {
    let flag = moved_away_flag()?;
    let fresh = SharedFlag::new();
    flag.assign_from(&fresh)?;
    assert!(flag.valid());
    flag.set()?;
    assert!(fresh.get()?);

    let reader = moved_away_reader()?;
    let donor = fresh.reader()?;
    reader.move_from(&donor)?;
    assert!(reader.get()?);
    assert!(!donor.valid());
    Ok(())
}

// ---------------------------------------------------------------------------
// Destruction

#[test]
fn dropping_one_handle_does_not_affect_others() -> Result<()> {
    let first = SharedFlag::new();
    {
        let second = SharedFlag::new();
        first.assign_from(&second)?;
    }
    first.set()?;
    assert!(first.valid());
    assert!(first.get()?);
    Ok(())
}

#[test]
fn reader_outlives_every_flag() -> Result<()> {
    let reader = {
        let flag = SharedFlag::new();
        flag.set()?;
        flag.reader()?
    };
    assert!(reader.get()?);
    assert!(reader.wait_for(Duration::ZERO)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// set / get / bool conversion

#[test]
fn set_is_idempotent() -> Result<()> {
    let first = SharedFlag::new();
    let second = first.try_clone()?;
    first.set()?;
    assert!(second.get()?);
    first.set()?;
    second.set()?;
    assert!(second.get()?);
    Ok(())
}

#[test]
fn set_on_moved_away_flag_fails() -> Result<()> {
    assert_eq!(moved_away_flag()?.set(), Err(FlagError::MovedAway));
    Ok(())
}

#[test]
fn get_reports_the_value() -> Result<()> {
    let flag = SharedFlag::new();
    assert!(!flag.get()?);
    flag.set()?;
    assert!(flag.get()?);
    Ok(())
}

#[test]
fn bool_conversion_is_an_alias_for_get() -> Result<()> {
    let flag = SharedFlag::new();
    let reader = flag.reader()?;
    assert!(!bool::try_from(&flag)?);
    assert!(!bool::try_from(&reader)?);
    flag.set()?;
    assert!(bool::try_from(&flag)?);
    assert!(bool::try_from(&reader)?);

    assert_eq!(bool::try_from(&moved_away_flag()?), Err(FlagError::MovedAway));
    assert_eq!(
        bool::try_from(&moved_away_reader()?),
        Err(FlagError::MovedAway)
    );
    Ok(())
}

#[test]
fn valid_tracks_moves() -> Result<()> {
    let flag = SharedFlag::new();
    assert!(flag.valid());
    let moved = flag.take()?;
    assert!(!flag.valid());
    flag.move_from(&moved)?;
    assert!(flag.valid());
    assert!(!moved.valid());
    Ok(())
}

// ---------------------------------------------------------------------------
// Waits on moved-away handles

#[test]
fn waits_on_moved_away_handles_fail() -> Result<()> {
    let flag = moved_away_flag()?;
    assert_eq!(flag.wait(), Err(FlagError::MovedAway));
    assert_eq!(
        flag.wait_for(Duration::from_millis(10)),
        Err(FlagError::MovedAway)
    );

    let reader = moved_away_reader()?;
    assert_eq!(reader.wait(), Err(FlagError::MovedAway));
    assert_eq!(
        reader.wait_until(std::time::Instant::now() + Duration::from_millis(10)),
        Err(FlagError::MovedAway)
    );
    Ok(())
}

#[test]
fn same_state_fails_when_either_side_is_moved_away() -> Result<()> {
    let flag = SharedFlag::new();
    let empty = moved_away_flag()?;
    assert_eq!(flag.same_state(&empty), Err(FlagError::MovedAway));
    assert_eq!(empty.same_state(&flag), Err(FlagError::MovedAway));
    assert!(flag.same_state(&flag)?);
    Ok(())
}
