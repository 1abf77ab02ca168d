//! Checksum verification of downloaded artifacts
//!
//! Every artifact the downloader produces has a known-good SHA-256 digest
//! compiled into [`ChecksumTable::reference`]. Verification hashes the exact
//! stored bytes. A missing file, an unknown accession or a mismatch answer
//! `Ok(false)` and it is up to the caller to decide whether to retry; a file
//! that exists but cannot be read is a storage error.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::app::hash::{InvalidHash, Sha256Hash};
use crate::app::storage::{self, StorageLayout};
use crate::errors::StorageResult;

/// Expected digests of the accessions artifact and each marker artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumTable {
    accessions: Sha256Hash,
    markers: BTreeMap<String, Sha256Hash>,
}

/// Published digests, keyed by accession id
const REFERENCE_MARKER_DIGESTS: [(&str, &str); 25] = [
    ("NC_000001.10", "49e24934b957823c20a0e06d0fddb5847461698f698526ae30e9cadd4b474097"),
    ("NC_000002.11", "e7d5ebbb2615db114877dfd548eeac686ce10060ff30e64c6e5217aafc8097e7"),
    ("NC_000003.11", "621118e4c629039b19c26b84afccafd96c95381f7650b9b3940f6d99195b3569"),
    ("NC_000004.11", "0a5728e95c9285aedfa64707fdaf79f269439a81259cfc7c6f63853189e57631"),
    ("NC_000005.9", "627421fa78c38c6d5ff3b5a908478dd3d3e1716cbab8cf9df2474dc888b0a4b4"),
    ("NC_000006.11", "9b50d25a1b51b8ea803b7816931bb9bbe77426595b4614630b3407ee3236734b"),
    ("NC_000007.13", "61837c3b490ffe04d11b13ac8c08b0d29dbf998533a9c38353eabad07c89aea3"),
    ("NC_000008.10", "11a998fac0478758e51dcb25e41292e2340502ac362e7b5391829b38bb5b8795"),
    ("NC_000009.11", "93ae29a398f61895adb3fad080f760f9026bef8ad89f84e2e146057471444bc5"),
    ("NC_000010.10", "4dd4d48b254ede88ce3aa5127e6e401e80175af5ebe0dd6be81e41ee288828ce"),
    ("NC_000011.9", "fb6f093d55124b93706164f2c65ff8eab6a86750d389812e244c283a22f0bd32"),
    ("NC_000012.11", "cbc47041fb82604477f5a7cc15120865b14f3c6d22d0447a4abddec98f4ee089"),
    ("NC_000013.10", "7db54fe352f9bc984050ec1cd4b19916bca87ca7449abbdfc2c6ad5cbdeecbbc"),
    ("NC_000014.8", "8a2720d41b36083f1d592c44e2e5b3b98cd6c3f7d192bc026dbe33c86c520732"),
    ("NC_000015.9", "507ea27a911d3ac5cb903ac6d222fba6517d433e2a38cc5ac47d28efe63c6490"),
    ("NC_000016.9", "c6c80ed86c7b5d1affc5cf84ca4caece6300bb26d2561427be4c55f77a1902d7"),
    ("NC_000017.10", "9eb4f771aa5e0dd0a60da89f95ce7ecbf4dc94fafc83ae73d2f6165ce1b085d8"),
    ("NC_000018.9", "1e4eb9ec5db9fd9b13ebca26d30bf8243ead1a17df79532110cd1d021359d9de"),
    ("NC_000019.9", "f5d5c0274180da355792bd268c48033d33a32059a70a4aa0735ecb91417cef50"),
    ("NC_000020.10", "f2bcdf2104d0c0c89fa2e38ed6f7da10ac6bc8f529500d46f745ad4bef28c085"),
    ("NC_000021.8", "03c6aa9e7119b9c298a25d38f115d84bd44a6bdca5ef21d9a9bd89ad4c73687c"),
    ("NC_000022.10", "0dba1048a66b721935176c8cff7d60704d0e70378c673b9ca0fa50dd1215998f"),
    ("NC_000023.10", "8b0030bb8c57a8d73b8a8bbf325fc5139c220a79ae41070f37be6cd2ce222dd3"),
    ("NC_000024.9", "c0aa27938ea45e74cb999700064f6c38cca644e44717669c2a6bd618013dc7a0"),
    ("NC_012920.1", "a8362265b5a856a89d1dbc7959439af74b2ecd6dfc318ca96acd4a1167be20d5"),
];

const REFERENCE_ACCESSIONS_DIGEST: &str =
    "3be7720b22d420fc7af2cbf7933c7257c2319e5bc5fd0422ab608b2a1b5fb80f";

impl ChecksumTable {
    /// Build a table from already-parsed digests
    pub fn new(
        accessions: Sha256Hash,
        markers: impl IntoIterator<Item = (String, Sha256Hash)>,
    ) -> Self {
        Self {
            accessions,
            markers: markers.into_iter().collect(),
        }
    }

    /// The published digests for the reference deployment
    pub fn reference() -> Result<Self, InvalidHash> {
        let markers = REFERENCE_MARKER_DIGESTS
            .iter()
            .map(|(id, hex)| Sha256Hash::from_hex(hex).map(|hash| (id.to_string(), hash)))
            .collect::<Result<Vec<_>, InvalidHash>>()?;

        Ok(Self::new(
            Sha256Hash::from_hex(REFERENCE_ACCESSIONS_DIGEST)?,
            markers,
        ))
    }

    pub fn accessions(&self) -> &Sha256Hash {
        &self.accessions
    }

    /// Expected digest for an accession's markers, if the accession is known
    pub fn markers(&self, accession_id: &str) -> Option<&Sha256Hash> {
        self.markers.get(accession_id)
    }

    /// Known accession ids in sorted order
    pub fn accession_ids(&self) -> impl Iterator<Item = &str> {
        self.markers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Validity of every artifact named in the checksum table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the accessions artifact is valid
    pub accession: bool,
    /// Marker artifact validity by accession id
    pub markers: BTreeMap<String, bool>,
}

impl ValidationReport {
    /// Whether every artifact is valid
    pub fn is_successful(&self) -> bool {
        self.accession && self.markers.values().all(|valid| *valid)
    }

    /// Accession ids whose marker artifact is missing or corrupt
    pub fn invalid_markers(&self) -> Vec<&str> {
        self.markers
            .iter()
            .filter(|(_, valid)| !**valid)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn valid_count(&self) -> usize {
        self.markers.values().filter(|valid| **valid).count()
    }
}

/// Verifies stored artifacts against a [`ChecksumTable`]
#[derive(Debug, Clone)]
pub struct ChecksumVerifier {
    table: ChecksumTable,
    layout: StorageLayout,
}

impl ChecksumVerifier {
    pub fn new(table: ChecksumTable, layout: StorageLayout) -> Self {
        Self { table, layout }
    }

    pub fn table(&self) -> &ChecksumTable {
        &self.table
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    /// Whether the accessions artifact exists and matches its digest
    pub async fn verify_accessions(&self) -> StorageResult<bool> {
        let path = self.layout.accessions_path();
        Self::verify_file(&path, self.table.accessions()).await
    }

    /// Whether an accession's marker artifact exists and matches its digest
    ///
    /// Accessions absent from the table are never valid.
    pub async fn verify_markers(&self, accession_id: &str) -> StorageResult<bool> {
        let Some(expected) = self.table.markers(accession_id) else {
            debug!("No checksum on record for accession {}", accession_id);
            return Ok(false);
        };
        let path = self.layout.marker_path(accession_id);
        Self::verify_file(&path, expected).await
    }

    /// Check every artifact named in the table
    ///
    /// # Errors
    ///
    /// Fails on the first artifact that exists but cannot be read
    pub async fn validate_all(&self) -> StorageResult<ValidationReport> {
        let mut report = ValidationReport {
            accession: self.verify_accessions().await?,
            ..Default::default()
        };

        for accession_id in self.table.accession_ids() {
            let valid = self.verify_markers(accession_id).await?;
            report.markers.insert(accession_id.to_string(), valid);
        }

        debug!(
            "Validated {} marker artifacts, {} valid",
            report.markers.len(),
            report.valid_count()
        );
        Ok(report)
    }

    async fn verify_file(path: &Path, expected: &Sha256Hash) -> StorageResult<bool> {
        let content = storage::read_optional(path).await.map_err(|e| {
            error!("Artifact {} exists but is unreadable: {}", path.display(), e);
            e
        })?;
        let Some(content) = content else {
            return Ok(false);
        };

        let actual = Sha256Hash::digest(&content);
        if actual != *expected {
            debug!(
                "Checksum mismatch for {}: expected {}, got {}",
                path.display(),
                expected,
                actual
            );
        }
        Ok(actual == *expected)
    }
}
