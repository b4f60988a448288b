// featconf/tests/cli_tests.rs

use featconf::cli::{self, Destination};
use fsfrs::Warning;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const DESIGN: &str = include_str!("../../fsfrs/tests/fixtures/design.fsf");

fn design_file() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("design.fsf");
    fs_err::write(&path, DESIGN).unwrap();
    (dir, path)
}

fn run<F>(f: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> anyhow::Result<()>,
{
    let mut out = Vec::new();
    f(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn print_echoes_the_design() {
    let (_dir, path) = design_file();
    assert_eq!(run(|out| cli::print_document(&path, out)), DESIGN);
}

#[test]
fn inputs_are_listed_in_order() {
    let (_dir, path) = design_file();
    let listing = run(|out| cli::list_inputs(&path, out));
    assert_eq!(
        listing,
        " feat_files(1)  : /data/study/sub-01/run1.feat\n \
         feat_files(2)  : /data/study/sub-02/run1.feat\n \
         feat_files(3)  : /data/study/sub-03/run1.feat\n"
    );
}

#[test]
fn contrasts_are_listed() {
    let (_dir, path) = design_file();
    let listing = run(|out| cli::list_contrasts(&path, out));
    assert_eq!(
        listing,
        " fmri(conname_real.1)  : group mean\n \
         fmri(conname_real.2)  : negative mean\n"
    );
}

#[test]
fn set_writes_to_stdout_without_output() {
    let (_dir, path) = design_file();
    let edited = run(|out| {
        let warning =
            cli::set_value(&path, "fmri(z_thresh)", "2.3", &Destination::default(), out)?;
        assert_eq!(warning, None);
        Ok(())
    });
    assert_eq!(
        edited,
        DESIGN.replace("set fmri(z_thresh) 3.1", "set fmri(z_thresh) 2.3")
    );
    // source file untouched
    assert_eq!(fs_err::read_to_string(&path).unwrap(), DESIGN);
}

#[test]
fn setting_an_unknown_key_returns_a_warning() {
    let (_dir, path) = design_file();
    let mut warning = None;
    let edited = run(|out| {
        warning = cli::set_value(&path, "fmri(newsetting)", "4", &Destination::default(), out)?;
        Ok(())
    });
    let warning = warning.expect("unknown key should warn");
    assert_eq!(
        warning,
        Warning::UnknownKeySet {
            key: "fmri(newsetting)".to_string()
        }
    );
    assert_eq!(warning.to_string(), "setting new item [fmri(newsetting)]");
    assert!(edited.ends_with("set fmri(newsetting) 4\n\n##########################################################\n# Now options that don't appear in the GUI\n"));
}

#[test]
fn output_file_requires_force_to_overwrite() {
    let (dir, path) = design_file();
    let target = dir.path().join("edited.fsf");
    let destination = Destination {
        output: Some(target.clone()),
        force: false,
    };

    let report = cli::remove_inputs(&path, r".*sub-02", &destination, &mut Vec::new()).unwrap();
    assert_eq!(report.removed, vec!["/data/study/sub-02/run1.feat"]);
    let edited = fsfrs::read(&target).unwrap();
    assert_eq!(edited.inputs().len(), 2);
    assert_eq!(edited.get("fmri(npts)").unwrap().as_integer().unwrap(), 2);

    let err = cli::drop_input(&path, 1, &destination, &mut Vec::new()).unwrap_err();
    assert!(format!("{:#}", err).contains("File already exists"));

    let forced = Destination {
        force: true,
        ..destination
    };
    let removed = cli::drop_input(&path, 1, &forced, &mut Vec::new()).unwrap();
    assert_eq!(removed.value().as_text().unwrap(), "/data/study/sub-01/run1.feat");
    let edited = fsfrs::read(&target).unwrap();
    assert_eq!(
        edited.get("feat_files(1)").unwrap().as_text().unwrap(),
        "/data/study/sub-02/run1.feat"
    );
}

#[test]
fn errors_carry_context() {
    let missing = Path::new("/nonexistent/design.fsf");
    let err = cli::print_document(missing, &mut Vec::new()).unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/design.fsf"));

    let (_dir, path) = design_file();
    let err = cli::drop_input(&path, 7, &Destination::default(), &mut Vec::new()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to remove input 7"));

    let err = cli::remove_inputs(&path, "(", &Destination::default(), &mut Vec::new())
        .unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid input pattern"));
}
