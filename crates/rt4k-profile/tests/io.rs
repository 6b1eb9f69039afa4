#![allow(missing_docs)]

use rt4k_profile::{ErrorKind, ProfileDocument, SchemaVersion, WriteOptions};

#[test]
fn test_save_then_build() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles/custom.rt4");

    let mut profile = ProfileDocument::new_default(SchemaVersion::V1_4_2).unwrap();
    profile.set("output.resolution", "1440p60").unwrap();
    profile.save(&path, WriteOptions::default()).unwrap();

    let loaded = ProfileDocument::build(&path).unwrap();
    assert_eq!(loaded, profile);
    assert_eq!(
        loaded.get_value("output.resolution").unwrap().as_string().unwrap(),
        "1440p60"
    );
    let crc = u16::from_le_bytes([loaded.as_bytes()[0x20], loaded.as_bytes()[0x21]]);
    assert_eq!(crc, loaded.crc());
}

#[test]
fn test_build_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ProfileDocument::build(dir.path().join("nope.rt4")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_build_rejects_non_profile() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("text.rt4");
    std::fs::write(&path, b"hello world, this is not a profile").unwrap();
    let err = ProfileDocument::build(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

mod async_io {
    use super::*;

    #[tokio::test]
    async fn test_save_then_build_async() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/async.rt4");

        let mut profile = ProfileDocument::new_default(SchemaVersion::V1_4_2).unwrap();
        profile.set("advanced.effects.mask.enabled", true).unwrap();
        profile.save_async(&path, WriteOptions::default()).await.unwrap();

        let loaded = ProfileDocument::build_async(&path).await.unwrap();
        assert!(loaded.get_value("advanced.effects.mask.enabled").unwrap().as_bool());
    }

    #[tokio::test]
    async fn test_build_async_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProfileDocument::build_async(dir.path().join("nope.rt4"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_write_without_parent_dirs_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/raw.rt4");
        let options = WriteOptions {
            create_parent_dirs: false,
        };
        let err = rt4k_profile::write_profile_bytes_async(&path, b"RT4K Profile", options)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        rt4k_profile::write_profile_bytes_async(&path, b"RT4K Profile", WriteOptions::default())
            .await
            .unwrap();
        let bytes = rt4k_profile::read_profile_bytes_async(&path).await.unwrap();
        assert_eq!(bytes, b"RT4K Profile");
    }
}
