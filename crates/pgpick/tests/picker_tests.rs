//! End-to-end picker sessions against a credentials file on disk.

use std::fs;
use std::path::Path;

use pgpick::app::{BrowseEvent, Event, ExitAction, FilterEvent, Mode, SelectionController, Step};
use pgpick::config::ClientConfig;
use pgpick::launch::ClientCommand;
use pgpick::pgpass::{load_connections, PgpassFile};
use tempfile::TempDir;

const SAMPLE: &str = "\
db1:5432:appdb:alice:secretA
db2:5432:appdb:bob:secretB
bad:line
";

fn write_pgpass(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("pgpass");
    fs::write(&path, content).unwrap();
    path
}

fn picker(path: &Path) -> SelectionController<PgpassFile> {
    SelectionController::load(PgpassFile::new(path)).unwrap()
}

fn commit(c: &mut SelectionController<PgpassFile>, text: &str) -> Step {
    c.handle(Event::Browse(BrowseEvent::StartFilter));
    c.handle(Event::Filter(FilterEvent::Commit(text.to_string())))
}

/// Scenario A: malformed lines are skipped, order is kept.
#[test]
fn test_load_skips_malformed_line() {
    let dir = TempDir::new().unwrap();
    let path = write_pgpass(&dir, SAMPLE);

    let conns = load_connections(&path).unwrap();
    assert_eq!(conns.len(), 2);
    assert_eq!(conns[0].host, "db1");
    assert_eq!(conns[0].username, "alice");
    assert_eq!(conns[1].host, "db2");
    assert_eq!(conns[1].username, "bob");
}

/// Scenario B: committing "db1" narrows the list to one entry.
#[test]
fn test_filter_narrows_to_single_connection() {
    let dir = TempDir::new().unwrap();
    let mut c = picker(&write_pgpass(&dir, SAMPLE));

    assert_eq!(commit(&mut c, "db1"), Step::Continue);
    assert_eq!(c.filtered().len(), 1);
    assert_eq!(c.filtered()[0].host, "db1");
    assert_eq!(c.cursor(), 0);
}

/// Scenario C: single entry, move down is a no-op, Enter selects it.
#[test]
fn test_confirm_single_connection() {
    let dir = TempDir::new().unwrap();
    let path = write_pgpass(&dir, SAMPLE);
    let mut c = picker(&path);
    commit(&mut c, "db1");

    c.handle(Event::Browse(BrowseEvent::MoveDown));
    assert_eq!(c.cursor(), 0);

    let step = c.handle(Event::Browse(BrowseEvent::ConfirmSelection));
    let Step::Exit(ExitAction::ConnectToSelected(chosen)) = step else {
        panic!("expected a connect exit, got {step:?}");
    };
    assert_eq!(chosen.host, "db1");
    assert_eq!(chosen.secret.expose(), "secretA");

    let cmd =
        ClientCommand::for_connection(&chosen, &ClientConfig::default(), Some(path.as_path()))
            .unwrap();
    assert_eq!(
        cmd.args,
        vec!["-h", "db1", "-p", "5432", "-U", "alice", "-d", "appdb"]
    );
}

/// Scenario D: no matches, Enter does nothing, quit exits without action.
#[test]
fn test_empty_filter_then_quit() {
    let dir = TempDir::new().unwrap();
    let mut c = picker(&write_pgpass(&dir, SAMPLE));

    commit(&mut c, "zzz");
    assert!(c.filtered().is_empty());

    assert_eq!(
        c.handle(Event::Browse(BrowseEvent::ConfirmSelection)),
        Step::Continue
    );
    assert_eq!(c.mode(), Mode::Browsing);
    assert!(c.exit_action().is_none());

    assert_eq!(
        c.handle(Event::Browse(BrowseEvent::Quit)),
        Step::Exit(ExitAction::None)
    );
}

#[test]
fn test_refilter_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut c = picker(&write_pgpass(&dir, SAMPLE));

    commit(&mut c, "appdb");
    let first = c.filtered().to_vec();
    c.handle(Event::Browse(BrowseEvent::MoveDown));
    assert_eq!(c.cursor(), 1);

    commit(&mut c, "appdb");
    assert_eq!(c.filtered(), first.as_slice());
    assert_eq!(c.cursor(), 0);
}

#[test]
fn test_reload_picks_up_file_changes_and_keeps_filter() {
    let dir = TempDir::new().unwrap();
    let path = write_pgpass(&dir, SAMPLE);
    let mut c = picker(&path);
    commit(&mut c, "bob");
    assert_eq!(c.filtered().len(), 1);

    fs::write(
        &path,
        "db3:5432:reports:bob:x\ndb1:5432:appdb:alice:secretA\ndb2:5432:appdb:bob:secretB\n",
    )
    .unwrap();
    c.handle(Event::Browse(BrowseEvent::MoveDown));
    c.handle(Event::Browse(BrowseEvent::Reload));

    assert_eq!(c.filter_text(), "bob");
    assert_eq!(c.connections().len(), 3);
    let hosts: Vec<&str> = c.filtered().iter().map(|c| c.host.as_str()).collect();
    assert_eq!(hosts, vec!["db3", "db2"]);
    assert_eq!(c.cursor(), 0);
}

#[test]
fn test_reload_after_file_removed_keeps_last_good_set() {
    let dir = TempDir::new().unwrap();
    let path = write_pgpass(&dir, SAMPLE);
    let mut c = picker(&path);

    fs::remove_file(&path).unwrap();
    assert_eq!(
        c.handle(Event::Browse(BrowseEvent::Reload)),
        Step::Continue
    );

    assert_eq!(c.connections().len(), 2);
    let status = c.status().expect("reload error should be surfaced");
    assert!(status.is_error());
}

#[test]
fn test_startup_fails_without_credentials_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    assert!(SelectionController::load(PgpassFile::new(&missing)).is_err());
}
