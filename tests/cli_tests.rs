//! CLI integration tests
//!
//! Each test runs the binary inside its own temporary directory with the
//! user config directory pointed there too, so no stray config is read.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn bookmend(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bookmend").unwrap();
    cmd.current_dir(dir.path())
        .env("XDG_CONFIG_HOME", dir.path())
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

const UNALIGNED_BOOK: &str = r#"[
  {
    "part_title": "Part 1",
    "chapters": [
      {
        "chapter_title": "CHAPTER I. What Devotion Is",
        "content": [
          {"type": "p", "content": "What devotion is: you aspire to devotion, dear Philothea.", "word_count": 0},
          {"type": "p", "content": "Because you know it is most pleasing to God.", "word_count": 0}
        ]
      },
      {
        "chapter_title": "CHAPTER II. The Nature of Devotion",
        "content": [
          {"type": "p", "content": "The nature and excellence of devotion is shown here.", "word_count": 0}
        ]
      },
      {
        "chapter_title": "CHAPTER I. What Devotion Is",
        "content": [
          {"type": "p", "content": "What devotion is: you aspire to devotion, dear Philothea.", "word_count": 0},
          {"type": "p", "content": "Because you know it is most pleasing to God.", "word_count": 0}
        ]
      }
    ]
  },
  {
    "part_title": "Part 2",
    "chapters": [
      {
        "chapter_title": "CHAPTER I. The Necessity of Prayer",
        "content": [
          {"type": "p", "content": "The necessity of prayer is shown by the saints.", "word_count": 0}
        ]
      }
    ]
  }
]"#;

const TOC_CSV: &str = "Part,Chapter,Title,Page
I,I,What Devotion Is,1
I,II,The Nature and Excellence of Devotion,3
II,I,The Necessity of Prayer,40
";

const CONTAINER: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

const OPF: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0">
  <manifest>
    <item id="ncx" href="toc.ncx" media-type="application/x-dtbncx+xml"/>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
    <item id="ch2" href="ch2.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
  <spine toc="ncx">
    <itemref idref="ch1"/>
    <itemref idref="ch2"/>
  </spine>
</package>"#;

fn ncx(second_target: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <navMap>
    <navPoint id="np1" playOrder="1">
      <navLabel><text>Of Devotion</text></navLabel>
      <content src="ch1.xhtml"/>
    </navPoint>
    <navPoint id="np2" playOrder="2">
      <navLabel><text>Of Prayer</text></navLabel>
      <content src="{second_target}"/>
    </navPoint>
  </navMap>
</ncx>"#
    )
}

const CH1: &str = r#"<html><head><title>PART I</title></head><body>
<h2>CHAPTER I. Of Devotion</h2>
<p>True devotion presupposes the love of God.</p>
<p>It is a spiritual agility and vivacity.</p>
</body></html>"#;

const CH2: &str = r#"<html><head><title>PART II</title></head><body>
<h2>CHAPTER I. Of Prayer</h2>
<p>Prayer opens our understanding to the light.</p>
</body></html>"#;

fn write_epub(dir: &TempDir, name: &str, entries: &[(&str, &str)]) -> PathBuf {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (entry, body) in entries {
        writer.start_file(*entry, options).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();
    let path = dir.path().join(name);
    fs::write(&path, bytes).unwrap();
    path
}

fn sample_epub(dir: &TempDir, name: &str, ch2: &str, nav_target: &str) -> PathBuf {
    let ncx = ncx(nav_target);
    write_epub(
        dir,
        name,
        &[
            ("mimetype", "application/epub+zip"),
            ("META-INF/container.xml", CONTAINER),
            ("OEBPS/content.opf", OPF),
            ("OEBPS/toc.ncx", ncx.as_str()),
            ("OEBPS/ch1.xhtml", CH1),
            ("OEBPS/ch2.xhtml", ch2),
        ],
    )
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    bookmend(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("align"))
        .stdout(predicate::str::contains("verify-nav"));
}

#[test]
fn test_invalid_arguments_exit_code() {
    let dir = TempDir::new().unwrap();
    bookmend(&dir).args(["align", "book.json"]).assert().code(2);
}

#[test]
fn test_missing_input_exit_code() {
    let dir = TempDir::new().unwrap();
    bookmend(&dir)
        .args(["word-count", "missing.json"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("missing.json"));
}

#[test]
fn test_not_a_book_is_general_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "book.json", r#"{"part_title": "oops"}"#);
    bookmend(&dir).args(["word-count", "book.json"]).assert().code(1);
}

#[test]
fn test_word_count_in_place_with_backup() {
    let dir = TempDir::new().unwrap();
    let book = write(&dir, "book.json", UNALIGNED_BOOK);

    bookmend(&dir)
        .args(["word-count", "book.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6 of 6 items changed"));

    let json = read_json(&book);
    assert_eq!(json[0]["chapters"][0]["content"][0]["word_count"], 9);
    assert_eq!(json[1]["chapters"][0]["content"][0]["word_count"], 9);

    let backup = read_json(&dir.path().join("book_backup_wordcount.json"));
    assert_eq!(backup[0]["chapters"][0]["content"][0]["word_count"], 0);
}

#[test]
fn test_word_count_no_backup() {
    let dir = TempDir::new().unwrap();
    write(&dir, "book.json", UNALIGNED_BOOK);
    bookmend(&dir)
        .args(["word-count", "book.json", "--no-backup", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(!dir.path().join("book_backup_wordcount.json").exists());
}

#[test]
fn test_analyze_reports_duplicates_and_toc() {
    let dir = TempDir::new().unwrap();
    write(&dir, "book.json", UNALIGNED_BOOK);
    write(&dir, "toc.csv", TOC_CSV);

    bookmend(&dir)
        .args(["analyze", "book.json", "--toc", "toc.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2x CHAPTER I. What Devotion Is"))
        .stdout(predicate::str::contains("First divergence at position 2"))
        .stdout(predicate::str::contains("Status: issues found"));
}

#[test]
fn test_analyze_missing_toc() {
    let dir = TempDir::new().unwrap();
    write(&dir, "book.json", UNALIGNED_BOOK);
    bookmend(&dir)
        .args(["analyze", "book.json", "--toc", "nope.csv"])
        .assert()
        .code(3);
}

#[test]
fn test_align_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let book = write(&dir, "book.json", UNALIGNED_BOOK);
    write(&dir, "toc.csv", TOC_CSV);

    bookmend(&dir)
        .args(["align", "book.json", "--toc", "toc.csv", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry Run"))
        .stdout(predicate::str::contains(
            "CHAPTER II. The Nature and Excellence of Devotion <- CHAPTER II. The Nature of Devotion",
        ))
        .stdout(predicate::str::contains("4 collected, 3 unique"));

    assert_eq!(fs::read_to_string(book).unwrap(), UNALIGNED_BOOK);
    assert!(!dir.path().join("book_backup_align.json").exists());
}

#[test]
fn test_align_rebuilds_parts() {
    let dir = TempDir::new().unwrap();
    write(&dir, "book.json", UNALIGNED_BOOK);
    write(&dir, "toc.csv", TOC_CSV);

    bookmend(&dir)
        .args(["align", "book.json", "--toc", "toc.csv", "-o", "aligned.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Output: 2 parts, 3 chapters"));

    let json = read_json(&dir.path().join("aligned.json"));
    assert_eq!(json[0]["part_title"], "PART I");
    assert_eq!(json[0]["chapters"][0]["chapter_title"], "CHAPTER I. What Devotion Is");
    assert_eq!(
        json[0]["chapters"][0]["content"][0]["content"],
        "you aspire to devotion, dear Philothea."
    );
    assert_eq!(json[0]["chapters"][0]["content"][0]["word_count"], 6);
    assert_eq!(json[1]["part_title"], "PART II");
    assert_eq!(json[1]["chapters"][0]["chapter_title"], "CHAPTER I. The Necessity of Prayer");
}

#[test]
fn test_align_rejects_out_of_range_threshold() {
    let dir = TempDir::new().unwrap();
    let book = write(&dir, "book.json", UNALIGNED_BOOK);
    write(&dir, "toc.csv", TOC_CSV);

    bookmend(&dir)
        .args(["align", "book.json", "--toc", "toc.csv", "--fuzzy-threshold", "1.5"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("align.fuzzy_threshold"));
    assert_eq!(fs::read_to_string(book).unwrap(), UNALIGNED_BOOK);
}

#[test]
fn test_align_rejects_zero_prefix_from_config() {
    let dir = TempDir::new().unwrap();
    write(&dir, "book.json", UNALIGNED_BOOK);
    write(&dir, "toc.csv", TOC_CSV);
    write(&dir, "bookmend.toml", "[align]\ntitle_prefix_chars = 0\n");

    bookmend(&dir)
        .args(["align", "book.json", "--toc", "toc.csv", "--dry-run"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("align.title_prefix_chars"));
}

#[test]
fn test_align_with_config_part_titles() {
    let dir = TempDir::new().unwrap();
    write(&dir, "book.json", UNALIGNED_BOOK);
    write(&dir, "toc.csv", TOC_CSV);
    write(
        &dir,
        "settings.toml",
        "[part_titles]\nI = \"PART THE FIRST\"\n",
    );

    bookmend(&dir)
        .args([
            "--config",
            "settings.toml",
            "align",
            "book.json",
            "--toc",
            "toc.csv",
            "--preset",
            "sequential",
        ])
        .assert()
        .success();

    let json = read_json(&dir.path().join("book.json"));
    assert_eq!(json[0]["part_title"], "PART THE FIRST");
    assert!(dir.path().join("book_backup_align.json").exists());
}

#[test]
fn test_split_titles_to_output() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "book.json",
        r#"[{"part_title": "PART THE FIRST - INSTRUCTIONS FOR THE LOVE OF GOD", "chapters": []},
            {"part_title": "PREFACE", "chapters": []}]"#,
    );

    bookmend(&dir)
        .args(["split-titles", "book.json", "-o", "out/split.json", "--no-backup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Part titles split: 1 of 2"));

    let json = read_json(&dir.path().join("out/split.json"));
    assert_eq!(json[0]["part_title"], "PART I");
    assert_eq!(json[0]["part_subtitle"], "Instructions for the love of God");
    assert!(json[1].get("part_subtitle").is_none());
}

#[test]
fn test_fix_applies_configured_corrections() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "book.json",
        r#"[{"part_title": "P", "chapters": [{"chapter_title": "C", "content": [
            {"type": "p", "content": "True devotlon [sic] presupposes love.", "word_count": 5}
        ]}]}]"#,
    );
    write(
        &dir,
        "bookmend.toml",
        "[[corrections]]\nfrom = \"devotlon\"\nto = \"devotion\"\n\n[[corrections]]\nfrom = \" [sic]\"\n",
    );

    bookmend(&dir)
        .args(["fix", "book.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Replacements: 2"));

    let json = read_json(&dir.path().join("book.json"));
    let item = &json[0]["chapters"][0]["content"][0];
    assert_eq!(item["content"], "True devotion presupposes love.");
    assert_eq!(item["word_count"], 4);
}

#[test]
fn test_extract_epub() {
    let dir = TempDir::new().unwrap();
    sample_epub(&dir, "book.epub", CH2, "ch2.xhtml");

    bookmend(&dir)
        .args(["extract", "book.epub", "-o", "book.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Chapters:  2"));

    let json = read_json(&dir.path().join("book.json"));
    assert_eq!(json[0]["part_title"], "PART I");
    assert_eq!(json[0]["chapters"][0]["chapter_title"], "CHAPTER I. Of Devotion");
    assert_eq!(json[0]["chapters"][0]["content"][0]["word_count"], 7);
    assert_eq!(json[1]["chapters"][0]["chapter_title"], "CHAPTER I. Of Prayer");
}

#[test]
fn test_extract_missing_epub() {
    let dir = TempDir::new().unwrap();
    bookmend(&dir)
        .args(["extract", "nope.epub", "-o", "book.json"])
        .assert()
        .code(3);
}

#[test]
fn test_verify_nav_ok() {
    let dir = TempDir::new().unwrap();
    sample_epub(&dir, "book.epub", CH2, "ch2.xhtml#top");

    bookmend(&dir)
        .args(["verify-nav", "book.epub"])
        .assert()
        .success()
        .stdout(predicate::str::contains("NCX: OEBPS/toc.ncx"))
        .stdout(predicate::str::contains("Targets found:   2"));
}

#[test]
fn test_verify_nav_missing_target() {
    let dir = TempDir::new().unwrap();
    sample_epub(&dir, "book.epub", CH2, "text/ch2.xhtml");

    bookmend(&dir)
        .args(["verify-nav", "book.epub"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("MISSING"))
        .stderr(predicate::str::contains("OEBPS/text/ch2.xhtml"));
}

#[test]
fn test_compare_and_diff_content() {
    let dir = TempDir::new().unwrap();
    sample_epub(&dir, "original.epub", CH2, "ch2.xhtml");
    let extended = CH2.replace(
        "</body>",
        "<p>This edition is licensed under Creative Commons.</p></body>",
    );
    sample_epub(&dir, "derived.epub", &extended, "ch2.xhtml");

    bookmend(&dir)
        .args(["compare", "original.epub", "derived.epub"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total characters"))
        .stdout(predicate::str::contains("derived.epub vs original.epub: +"));

    bookmend(&dir)
        .args(["diff-content", "original.epub", "derived.epub"])
        .assert()
        .success()
        .stdout(predicate::str::contains("License and copyright (1 segments)"))
        .stdout(predicate::str::contains("This edition is licensed under Creative Commons"));
}
