fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use msalign_protocol::{
        BeginUploadRequest, BeginUploadResponse, CompleteUploadRequest, DirectoryUrlsResponse,
        ExistsResponse, ObjectRequest, PresignedUrlResponse,
    };

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture, re-serializes it, and compares the JSON values
    /// (key-order independent). Returns the parsed record for further checks.
    fn roundtrip<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));
        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  wire: {fixture}\n  ours: {reserialized}"
        );
        parsed
    }

    // --- Requests ---

    #[test]
    fn fixture_object_request_outside_execution() {
        let req: ObjectRequest = roundtrip("object_request.json");
        assert_eq!(req.object_url.path(), "/data/unaligned/seqs.fa");
        assert!(req.execution_name.is_none());
    }

    #[test]
    fn fixture_object_request_in_execution() {
        let req: ObjectRequest = roundtrip("object_request_in_execution.json");
        assert_eq!(req.object_url.directory_key(), "runs/");
        assert_eq!(req.execution_name.as_deref(), Some("a1b2c3d4e5f6g7h8i9j0"));
    }

    #[test]
    fn fixture_begin_upload_request() {
        let req: BeginUploadRequest = roundtrip("begin_upload_request.json");
        assert_eq!(req.nrof_parts, 3);
        assert_eq!(req.content_type, "application/octet-stream");
    }

    #[test]
    fn fixture_complete_upload_request() {
        let req: CompleteUploadRequest = roundtrip("complete_upload_request.json");
        let numbers: Vec<u32> = req.parts.iter().map(|p| p.part_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(req.parts.iter().all(|p| p.etag.starts_with('"')));
    }

    #[test]
    fn object_url_must_be_a_locator() {
        let bad = serde_json::json!({
            "object_url": "s3://bucket/seqs.fa",
            "execution_name": null,
        });
        assert!(serde_json::from_value::<ObjectRequest>(bad).is_err());
    }

    // --- Responses ---

    #[test]
    fn fixture_exists_response() {
        let resp: ExistsResponse = roundtrip("exists_response.json");
        assert!(resp.exists);
    }

    #[test]
    fn fixture_presigned_url_response() {
        let resp: PresignedUrlResponse = roundtrip("presigned_url_response.json");
        assert!(resp.url.starts_with("https://"));
    }

    #[test]
    fn fixture_directory_urls_response() {
        let resp: DirectoryUrlsResponse = roundtrip("directory_urls_response.json");
        let keys: Vec<&str> = resp.key_to_url_map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            ["runs/", "runs/alignment_mafft.fa", "runs/logs/mafft.stderr"]
        );
    }

    #[test]
    fn fixture_begin_upload_response_orders_parts_numerically() {
        let resp: BeginUploadResponse = roundtrip("begin_upload_response.json");
        let parts = resp.ordered_urls().unwrap();
        let indices: Vec<u32> = parts.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, (0..=10).collect::<Vec<_>>());
        for (index, url) in &parts {
            assert!(url.contains(&format!("partNumber={}&", index + 1)), "{url}");
        }
    }
}
