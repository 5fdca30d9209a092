//! Job fingerprints
//!
//! A fingerprint is the SHA-256 of the settings that decide what a job
//! fetches, after command-line overrides. Two exports with the same
//! fingerprint came from identical requests. The token is left out so the
//! value can be printed and shared.

use crate::config::types::{ClientConfig, CrawlConfig, MembersConfig};
use sha2::{Digest, Sha256};

impl CrawlConfig {
    pub fn fingerprint(&self) -> String {
        let mut hasher = job_hasher("wall", &self.client);
        field(&mut hasher, "domain", &self.domain);
        field(&mut hasher, "owner-id", &self.owner_id.to_string());
        field(&mut hasher, "count", &self.count.to_string());
        field(&mut hasher, "filter", &self.filter_keywords.to_string());
        if self.filter_keywords {
            field(
                &mut hasher,
                "keywords-path",
                &self.keywords_path.to_string_lossy(),
            );
        }
        hex::encode(hasher.finalize())
    }
}

impl MembersConfig {
    /// Fingerprint of a member listing issued through `client`
    pub fn fingerprint(&self, client: &ClientConfig) -> String {
        let mut hasher = job_hasher("members", client);
        field(&mut hasher, "group-id", &self.group_id);
        field(&mut hasher, "count", &self.count.to_string());
        field(&mut hasher, "offset", &self.offset.to_string());
        for (name, value) in [
            ("sort", &self.sort),
            ("fields", &self.fields),
            ("filter", &self.filter),
        ] {
            if let Some(value) = value {
                field(&mut hasher, name, value);
            }
        }
        hex::encode(hasher.finalize())
    }
}

fn job_hasher(kind: &str, client: &ClientConfig) -> Sha256 {
    let mut hasher = Sha256::new();
    field(&mut hasher, "job", kind);
    field(&mut hasher, "base-url", client.api_base.trim_end_matches('/'));
    field(&mut hasher, "version", &client.api_version);
    hasher
}

// Hashed as one `name=value` line per field
fn field(hasher: &mut Sha256, name: &str, value: &str) {
    hasher.update(name.as_bytes());
    hasher.update(b"=");
    hasher.update(value.as_bytes());
    hasher.update(b"\n");
}
