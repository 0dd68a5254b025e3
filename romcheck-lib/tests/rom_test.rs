//! End-to-end ROM test runs over zip fixtures in a temporary directory.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Mutex;

use romcheck_lib::{
    Catalog, Dialect, GameDefinition, RomDefinition, State, TestError, TestOptions, TestProgress,
    Verdict, inspect_game, load_catalog, resolve_parent_chain, test_directory,
    test_directory_with_progress, test_file,
};
use zip::write::SimpleFileOptions;

fn crc(data: &[u8]) -> String {
    format!("{:08x}", crc32fast::hash(data))
}

fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    for (name, data) in files {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
}

fn write_7z(path: &Path, files: &[(&str, &[u8])]) {
    let src = tempfile::tempdir().unwrap();
    for (name, data) in files {
        let file = src.path().join(name);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(file, data).unwrap();
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    sevenz_rust::compress_to_path(src.path(), path).unwrap();
}

fn sample_catalog() -> Catalog {
    Catalog::from_games([
        GameDefinition::new("neogeo")
            .bios(true)
            .with_rom(RomDefinition::new("sp-s2.sp1", 4, &crc(b"bios"))),
        GameDefinition::new("mslug")
            .with_parent("neogeo")
            .with_rom(RomDefinition::new("a.bin", 3, &crc(b"abc")))
            .with_rom(RomDefinition::new("b.bin", 4, &crc(b"abcd"))),
        GameDefinition::new("mslugx")
            .with_parent("mslug")
            .with_rom(RomDefinition::new("x.bin", 1, &crc(b"x")))
            .with_rom(RomDefinition::new("a.bin", 3, &crc(b"abc")).with_merge_name("a.bin")),
        GameDefinition::new("broken")
            .with_rom(RomDefinition::new("badsize.rom", 4, "b2a5c80f"))
            .with_rom(RomDefinition::new("gone.bin", 3, &crc(b"abc"))),
        GameDefinition::new("corrupt").with_rom(RomDefinition::new("c.bin", 1, &crc(b"x"))),
    ])
}

/// ROM root with one good set, a clone missing a merged ROM, a bad set,
/// an unknown archive, a corrupt archive and a file that is not an archive.
fn sample_tree() -> (tempfile::TempDir, tempfile::TempDir) {
    let roms = tempfile::tempdir().unwrap();
    let bios = tempfile::tempdir().unwrap();
    let root = roms.path();

    write_zip(&root.join("mslug.zip"), &[("a.bin", b"abc"), ("b.bin", b"abcd")]);
    write_zip(&root.join("clones/mslugx.zip"), &[("x.bin", b"x")]);
    write_zip(&root.join("broken.zip"), &[("badsize.rom", b"toolong")]);
    write_zip(&root.join("unknown.zip"), &[("a.bin", b"abc")]);
    std::fs::write(root.join("corrupt.zip"), b"not a zip").unwrap();
    std::fs::write(root.join("readme.txt"), b"hello").unwrap();
    write_zip(&bios.path().join("neogeo.zip"), &[("sp-s2.sp1", b"bios")]);

    (roms, bios)
}

fn find<'a>(report: &'a romcheck_lib::Report, file: &str) -> &'a romcheck_lib::FileResult {
    report
        .list
        .iter()
        .find(|f| f.file_path.file_name().and_then(|n| n.to_str()) == Some(file))
        .unwrap()
}

fn options_with_bios(bios: &Path) -> TestOptions {
    TestOptions::new().bios_dir(Some(bios.to_path_buf()))
}

#[test]
fn directory_run_classifies_every_archive() {
    let (roms, bios) = sample_tree();
    let catalog = sample_catalog();
    let cancel = AtomicBool::new(false);

    let report = test_directory(&catalog, roms.path(), &options_with_bios(bios.path()), &cancel)
        .unwrap();

    // readme.txt is filtered by extension
    assert_eq!(report.list.len(), 5);

    let mslug = find(&report, "mslug.zip");
    assert_eq!(mslug.verdict(), Verdict::Ok);
    assert_eq!(mslug.green.len(), 2);
    assert_eq!(mslug.status(), State::Green);
    assert_eq!(mslug.parent_list.len(), 1);
    assert!(mslug.parent_list[0].exist);
    assert!(mslug.parent_list[0].is_bios);

    let clone = find(&report, "mslugx.zip");
    assert_eq!(clone.game.as_deref(), Some("mslugx"));
    assert_eq!(clone.yellow.len(), 1);
    assert!(clone.red.is_empty());
    assert_eq!(clone.verdict(), Verdict::Warn);
    // Parent found next to the ROM root, BIOS in the BIOS directory
    let names: Vec<&str> = clone.parent_list.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["mslug.zip", "neogeo.zip"]);
    assert!(clone.parent_list.iter().all(|p| p.exist));

    let broken = find(&report, "broken.zip");
    // Size and CRC reported separately, plus one missing ROM
    assert_eq!(broken.red.len(), 3);
    assert_eq!(broken.status(), State::Red);
    assert_eq!(broken.verdict(), Verdict::Error);

    let unknown = find(&report, "unknown.zip");
    assert!(unknown.game.is_none());
    assert_eq!(unknown.note.as_deref(), Some("not in catalog"));
    assert_eq!(unknown.verdict(), Verdict::Warn);

    let corrupt = find(&report, "corrupt.zip");
    assert_eq!(corrupt.game.as_deref(), Some("corrupt"));
    assert!(corrupt.archive_error);
    assert!(corrupt.note.is_some());
    assert!(corrupt.red.is_empty());
    assert_eq!(corrupt.status(), State::Red);

    assert!(report.has_failures());
    let counts = report.counts();
    assert_eq!(counts.ok, 1);
    assert_eq!(counts.warn, 2);
    assert_eq!(counts.error, 2);
}

#[test]
fn corrupt_archive_only_is_listed_but_not_a_failure() {
    let roms = tempfile::tempdir().unwrap();
    std::fs::write(roms.path().join("mslug.zip"), b"not a zip").unwrap();
    let cancel = AtomicBool::new(false);

    let report = test_directory(&sample_catalog(), roms.path(), &TestOptions::new(), &cancel)
        .unwrap();
    assert_eq!(report.list.len(), 1);
    assert_eq!(report.list[0].verdict(), Verdict::Error);
    assert!(!report.has_failures());
}

#[test]
fn missing_bios_warns_without_failing() {
    let (roms, _bios) = sample_tree();
    std::fs::remove_file(roms.path().join("broken.zip")).unwrap();
    let cancel = AtomicBool::new(false);

    // No BIOS directory: neogeo.zip is looked for under the ROM root
    let report =
        test_directory(&sample_catalog(), roms.path(), &TestOptions::new(), &cancel).unwrap();
    let mslug = find(&report, "mslug.zip");
    assert_eq!(mslug.missing_parents().count(), 1);
    assert_eq!(mslug.verdict(), Verdict::Warn);
    assert!(!report.has_failures());
}

#[test]
fn extension_filter_is_case_insensitive() {
    let (roms, bios) = sample_tree();
    let cancel = AtomicBool::new(false);
    let options = options_with_bios(bios.path()).extensions(&[".ZIP"]);
    let report = test_directory(&sample_catalog(), roms.path(), &options, &cancel).unwrap();
    assert_eq!(report.list.len(), 5);

    let only_7z = options_with_bios(bios.path()).extensions(&["7z"]);
    let report = test_directory(&sample_catalog(), roms.path(), &only_7z, &cancel).unwrap();
    assert!(report.list.is_empty());
}

#[test]
fn repeated_runs_are_identical() {
    let (roms, bios) = sample_tree();
    let catalog = sample_catalog();
    let options = options_with_bios(bios.path());
    let cancel = AtomicBool::new(false);

    let first = test_directory(&catalog, roms.path(), &options, &cancel).unwrap();
    let second = test_directory(&catalog, roms.path(), &options, &cancel).unwrap();
    assert_eq!(first, second);
}

#[test]
fn cancellation_stops_the_run() {
    let (roms, bios) = sample_tree();
    let cancel = AtomicBool::new(true);
    let result = test_directory(&sample_catalog(), roms.path(), &options_with_bios(bios.path()), &cancel);
    assert!(matches!(result, Err(TestError::Cancelled)));
}

#[test]
fn progress_reports_each_archive() {
    let (roms, bios) = sample_tree();
    let cancel = AtomicBool::new(false);
    let seen: Mutex<Vec<String>> = Mutex::new(Vec::new());

    let report = test_directory_with_progress(
        &sample_catalog(),
        roms.path(),
        &options_with_bios(bios.path()),
        &cancel,
        &|event| {
            if let TestProgress::Testing { file_name, .. } = event {
                seen.lock().unwrap().push(file_name);
            }
        },
    )
    .unwrap();

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), report.list.len());
    let walked: Vec<String> = report
        .list
        .iter()
        .map(|f| f.file_path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(seen, walked);
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = AtomicBool::new(false);
    let result = test_directory(
        &sample_catalog(),
        &dir.path().join("absent"),
        &TestOptions::new(),
        &cancel,
    );
    assert!(matches!(result, Err(TestError::Walk(_))));
}

#[test]
fn parent_chain_for_a_game_name() {
    let (roms, bios) = sample_tree();
    let chain = resolve_parent_chain(
        &sample_catalog(),
        "mslugx",
        roms.path(),
        &options_with_bios(bios.path()),
    );
    assert_eq!(chain.len(), 2);
    assert_eq!(chain[0].name, "mslug.zip");
    assert!(chain[0].exist);
    assert!(chain[1].is_bios);
    assert!(chain[1].exist);
}

#[test]
fn single_file_and_inspection_agree() {
    let (roms, bios) = sample_tree();
    let catalog = sample_catalog();
    let options = options_with_bios(bios.path());
    let path: PathBuf = roms.path().join("broken.zip");

    let file = test_file(&catalog, &path, roms.path(), &options);
    let view = inspect_game(&catalog, &path, roms.path(), &options);
    assert_eq!(view.status, file.status());
    assert_eq!(view.dat_subroms.len(), file.red.len());
    assert_eq!(view.dat_subroms[0].name, "badsize.rom");
    assert!(view.dat_subroms[0].message.starts_with("size mismatch"));
    assert!(view.dat_subroms[1].message.starts_with("crc mismatch"));
    assert_eq!(view.dat_subroms[2].message, "missing");
}

#[test]
fn catalog_file_drives_a_run() {
    let (roms, bios) = sample_tree();
    let dat = roms.path().join("arcade.dat");
    std::fs::write(
        &dat,
        format!(
            "clrmamepro (\n\tname \"Test\"\n)\n\ngame (\n\tname mslug\n\tromof neogeo\n\
             \trom ( name a.bin size 3 crc {} )\n\trom ( name b.bin size 4 crc {} )\n)\n\n\
             resource (\n\tname neogeo\n\trom ( name sp-s2.sp1 size 4 crc {} )\n)\n",
            crc(b"abc"),
            crc(b"abcd"),
            crc(b"bios"),
        ),
    )
    .unwrap();

    let catalog = load_catalog(&dat, Dialect::FbNeo).unwrap();
    let cancel = AtomicBool::new(false);
    let report = test_directory(
        &catalog,
        roms.path(),
        &options_with_bios(bios.path()).extensions(&["zip"]),
        &cancel,
    )
    .unwrap();
    assert_eq!(find(&report, "mslug.zip").verdict(), Verdict::Ok);
}

#[test]
fn ancestor_lookup_ignores_extension_case() {
    let roms = tempfile::tempdir().unwrap();
    let bios = tempfile::tempdir().unwrap();
    write_zip(&roms.path().join("mslug.zip"), &[("a.bin", b"abc"), ("b.bin", b"abcd")]);
    write_zip(&roms.path().join("mslugx.ZIP"), &[("x.bin", b"x")]);
    write_zip(&bios.path().join("neogeo.zip"), &[("sp-s2.sp1", b"bios")]);

    let file = test_file(
        &sample_catalog(),
        &roms.path().join("mslugx.ZIP"),
        roms.path(),
        &options_with_bios(bios.path()),
    );
    let names: Vec<&str> = file.parent_list.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["mslug.zip", "neogeo.zip"]);
    assert!(file.parent_list.iter().all(|p| p.exist));
    assert_eq!(file.missing_parents().count(), 0);
}

#[test]
fn seven_zip_sets_are_tested_and_found_as_ancestors() {
    let roms = tempfile::tempdir().unwrap();
    let bios = tempfile::tempdir().unwrap();
    write_7z(&roms.path().join("mslug.7z"), &[("a.bin", b"abc"), ("b.bin", b"abcd")]);
    write_7z(&roms.path().join("clones/mslugx.7z"), &[("x.bin", b"x")]);
    write_zip(&bios.path().join("neogeo.zip"), &[("sp-s2.sp1", b"bios")]);
    let cancel = AtomicBool::new(false);

    let report = test_directory(
        &sample_catalog(),
        roms.path(),
        &options_with_bios(bios.path()),
        &cancel,
    )
    .unwrap();
    assert_eq!(report.list.len(), 2);

    let mslug = find(&report, "mslug.7z");
    assert_eq!(mslug.green.len(), 2);
    assert_eq!(mslug.verdict(), Verdict::Ok);
    assert_eq!(mslug.parent_list[0].name, "neogeo.zip");
    assert!(mslug.parent_list[0].exist);

    // Parent in 7z next to the root, BIOS as zip in the BIOS directory
    let clone = find(&report, "mslugx.7z");
    assert!(clone.red.is_empty());
    assert_eq!(clone.yellow.len(), 1);
    let names: Vec<&str> = clone.parent_list.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["mslug.7z", "neogeo.zip"]);
    assert!(clone.parent_list.iter().all(|p| p.exist));
    assert!(!report.has_failures());
}

#[test]
fn missing_ancestor_keeps_the_default_extension() {
    let roms = tempfile::tempdir().unwrap();
    write_7z(&roms.path().join("mslugx.7z"), &[("x.bin", b"x")]);

    let file = test_file(
        &sample_catalog(),
        &roms.path().join("mslugx.7z"),
        roms.path(),
        &TestOptions::new(),
    );
    let names: Vec<&str> = file.parent_list.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["mslug.zip", "neogeo.zip"]);
    assert_eq!(file.missing_parents().count(), 2);
}
