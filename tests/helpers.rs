// Shared test helpers for database setup and vendor feed construction.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::io::Write;
use std::sync::Arc;

use flate2::write::GzEncoder;
use flate2::Compression;
use sqlx::SqlitePool;
use tempfile::TempDir;

use ipgeobase::run_migrations;

/// Creates a migrated test database pool backed by a temp file.
///
/// A file-backed database is used instead of `sqlite::memory:` because
/// every pooled connection to an in-memory database gets its own empty
/// database. The returned `TempDir` must outlive the pool.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> (Arc<SqlitePool>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("geobase_test.db");
    std::fs::File::create(&path).expect("Failed to create database file");

    let pool = SqlitePool::connect(&format!("sqlite:{}", path.display()))
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    (Arc::new(pool), dir)
}

/// Encodes a UTF-8 string as windows-1251, the way the vendor ships its
/// feed files and XML answers.
#[allow(dead_code)]
pub fn to_windows_1251(text: &str) -> Vec<u8> {
    let (bytes, _, _) = encoding_rs::WINDOWS_1251.encode(text);
    bytes.into_owned()
}

/// Builds a gzipped tar archive from `(member_name, content)` pairs.
#[allow(dead_code)]
pub fn build_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut tar_builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_path(name).expect("Failed to set member path");
        header.set_size(content.len() as u64);
        header.set_cksum();
        tar_builder
            .append(&header, *content)
            .expect("Failed to append member");
    }
    let tar_bytes = tar_builder.into_inner().expect("Failed to finish tar");

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&tar_bytes)
        .expect("Failed to gzip archive");
    encoder.finish().expect("Failed to finish gzip")
}

/// Builds a complete vendor archive from the two feed texts, transcoding
/// both to windows-1251.
#[allow(dead_code)]
pub fn build_feed_archive(ranges_text: &str, cities_text: &str) -> Vec<u8> {
    let ranges = to_windows_1251(ranges_text);
    let cities = to_windows_1251(cities_text);
    build_archive(&[
        ("cidr_optim.txt", ranges.as_slice()),
        ("cities.txt", cities.as_slice()),
    ])
}
