use assert_fs::TempDir;
use common::command::{
    init_repository_dir, open_repository, repository_dir, run_twig_command, stdout_of,
};
use common::file::{FileSpec, delete_path, write_file};
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use twig::artifacts::status::status_info::StatusInfo;

mod common;

fn paths(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[fixture]
fn file_a() -> String {
    r#"fn main() {
    let s = String::new();
    std::io::stdin().read_line(&mut s).unwrap();
    for i in 0..1000000000 {
        println!("{}",  s);
    }

    println!("Done");

    let tx = std::thread::spawn(move || {
        for i in 0..10 {
            println!("Thread: {}", i);
        }
    });

    tx.join().unwrap();

    println!("All threads completed");
}"#
    .to_string()
}

#[fixture]
fn file_b() -> String {
    r#"fn main() {
    let s = String::new();
    std::io::stdin().read_line(&mut s).unwrap();

    println!("Done");

    let tx = std::thread::spawn(move || {
        for i in 0..10 {
            println!("Thread: {}", i);
        }
    });

    if let Err(e) = tx.join() {
        eprintln!("Thread error: {}", e);
    }

    println!("All threads completed");
}"#
    .to_string()
}

#[fixture]
fn diff_hunks_output() -> String {
    "@@ -1,9 +1,6 @@\n fn main() {\n     let s = String::new();\n     std::io::stdin().read_line(&mut s).unwrap();\n-    for i in 0..1000000000 {\n-        println!(\"{}\",  s);\n-    }\n \n     println!(\"Done\");\n \n@@ -13,7 +10,9 @@\n         }\n     });\n \n-    tx.join().unwrap();\n+    if let Err(e) = tx.join() {\n+        eprintln!(\"Thread error: {}\", e);\n+    }\n \n     println!(\"All threads completed\");\n }\n"
        .to_string()
}

#[rstest]
fn status_classifies_unchanged_new_deleted_and_changed(
    repository_dir: TempDir,
) -> anyhow::Result<()> {
    let repository = open_repository(repository_dir.path());
    let dir = repository_dir.path();

    write_file(FileSpec::new(dir.join("a"), "alpha\n".to_string()));
    write_file(FileSpec::new(dir.join("c"), "gamma\n".to_string()));
    repository.add(&paths(&["a", "c"]))?;

    write_file(FileSpec::new(dir.join("b"), "beta\n".to_string()));
    delete_path(&dir.join("c"));

    assert_eq!(
        repository.status()?,
        StatusInfo {
            changed: vec![],
            new: paths(&["b"]),
            deleted: paths(&["c"]),
        }
    );

    write_file(FileSpec::new(dir.join("a"), "alpha, edited\n".to_string()));

    assert_eq!(repository.status()?.changed, paths(&["a"]));

    Ok(())
}

#[rstest]
fn same_size_edit_is_detected_by_content(repository_dir: TempDir) -> anyhow::Result<()> {
    let repository = open_repository(repository_dir.path());
    let file = repository_dir.path().join("a.txt");

    write_file(FileSpec::new(file.clone(), "abc\n".to_string()));
    repository.add(&paths(&["a.txt"]))?;
    write_file(FileSpec::new(file, "xyz\n".to_string()));

    assert_eq!(repository.status()?.changed, paths(&["a.txt"]));

    Ok(())
}

#[rstest]
fn touched_file_is_not_changed(repository_dir: TempDir) -> anyhow::Result<()> {
    let repository = open_repository(repository_dir.path());
    let file = repository_dir.path().join("a.txt");

    write_file(FileSpec::new(file.clone(), "abc\n".to_string()));
    repository.add(&paths(&["a.txt"]))?;
    filetime::set_file_mtime(&file, filetime::FileTime::from_unix_time(1_000_000, 0))?;

    assert!(repository.status()?.is_clean());

    Ok(())
}

#[rstest]
fn status_does_not_rewrite_the_index(repository_dir: TempDir) -> anyhow::Result<()> {
    let repository = open_repository(repository_dir.path());
    write_file(FileSpec::new(
        repository_dir.path().join("a.txt"),
        "abc\n".to_string(),
    ));
    repository.add(&paths(&["a.txt"]))?;
    let index_path = repository_dir.path().join(".git/index");
    let before = std::fs::read(&index_path)?;

    write_file(FileSpec::new(
        repository_dir.path().join("a.txt"),
        "changed\n".to_string(),
    ));
    repository.status()?;

    assert_eq!(std::fs::read(&index_path)?, before);

    Ok(())
}

#[rstest]
fn print_status_sections(init_repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();

    write_file(FileSpec::new(dir.join("1.txt"), "modified one\n".to_string()));
    write_file(FileSpec::new(dir.join("new.txt"), "new\n".to_string()));
    delete_path(&dir.join("3.txt"));

    let expected = "changed files:\n    1.txt\nnew files:\n    new.txt\ndeleted files:\n    3.txt\n";
    assert_eq!(stdout_of(&mut run_twig_command(dir, &["status"])), expected);

    Ok(())
}

#[rstest]
fn clean_status_prints_nothing(init_repository_dir: TempDir) {
    run_twig_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[rstest]
fn diff_shows_hunks_per_changed_file(
    repository_dir: TempDir,
    file_a: String,
    file_b: String,
    diff_hunks_output: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir.path();
    run_twig_command(dir, &["init"]).assert().success();
    write_file(FileSpec::new(dir.join("1.txt"), file_a.clone()));
    write_file(FileSpec::new(dir.join("2.txt"), file_a));
    run_twig_command(dir, &["add", "."]).assert().success();

    write_file(FileSpec::new(dir.join("1.txt"), file_b.clone()));
    write_file(FileSpec::new(dir.join("2.txt"), file_b));

    let expected = format!(
        "--- 1.txt (index)\n+++ 1.txt (working copy)\n{diff_hunks_output}{}\n--- 2.txt (index)\n+++ 2.txt (working copy)\n{diff_hunks_output}",
        "-".repeat(70)
    );

    assert_eq!(stdout_of(&mut run_twig_command(dir, &["diff"])), expected);

    Ok(())
}

#[rstest]
fn diff_lists_only_changed_files(repository_dir: TempDir) -> anyhow::Result<()> {
    let repository = open_repository(repository_dir.path());
    let dir = repository_dir.path();
    write_file(FileSpec::new(dir.join("keep.txt"), "same\n".to_string()));
    write_file(FileSpec::new(dir.join("edit.txt"), "one\ntwo\n".to_string()));
    write_file(FileSpec::new(dir.join("gone.txt"), "bye\n".to_string()));
    repository.add(&paths(&["."]))?;

    write_file(FileSpec::new(dir.join("edit.txt"), "one\n2\n".to_string()));
    write_file(FileSpec::new(dir.join("fresh.txt"), "hi\n".to_string()));
    delete_path(&dir.join("gone.txt"));

    assert_eq!(
        repository.diff()?,
        paths(&[
            "--- edit.txt (index)",
            "+++ edit.txt (working copy)",
            "@@ -1,2 +1,2 @@",
            " one",
            "-two",
            "+2",
        ])
    );

    Ok(())
}
