//! Operator commands: build trees, export proofs, verify claims.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use accrue_core::codec::{encode_leaf, hash_leaf};
use accrue_core::distribution::{ClaimProof, Distribution, Entitlement, ProofBundle};
use accrue_core::hashing::HashScheme;
use accrue_core::merkle;
use accrue_core::types::{AccountId, Hash256};
use tracing::{debug, info};

/// Read entitlements from a `.csv` (`beneficiary,amount` per line) or JSON
/// (array of `{"beneficiary", "amount"}`) file.
pub fn load_entries(path: &Path) -> Result<Vec<Entitlement>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        parse_csv(&text)
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse entitlements from {}", path.display()))
    }
}

/// Parse `beneficiary,amount` lines. Blank lines, `#` comments and a
/// leading `beneficiary,...` header are skipped.
pub fn parse_csv(text: &str) -> Result<Vec<Entitlement>> {
    let mut entries = Vec::new();
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if n == 0 && line.to_ascii_lowercase().starts_with("beneficiary") {
            continue;
        }
        let Some((who, amount)) = line.split_once(',') else {
            bail!("line {}: expected `beneficiary,amount`", n + 1);
        };
        let beneficiary: AccountId = who
            .trim()
            .parse()
            .with_context(|| format!("line {}: bad beneficiary", n + 1))?;
        let cumulative_amount: u64 = amount
            .trim()
            .parse()
            .with_context(|| format!("line {}: bad amount", n + 1))?;
        entries.push(Entitlement::new(beneficiary, cumulative_amount));
    }
    Ok(entries)
}

/// Build a distribution from `input` and write its bundle to `output`.
pub fn build(scheme: HashScheme, input: &Path, output: &Path) -> Result<ProofBundle> {
    let entries = load_entries(input)?;
    debug!(count = entries.len(), "loaded entitlements");
    let dist = Distribution::build(scheme, entries).context("Failed to build distribution")?;
    let bundle = dist.to_bundle();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(output, bundle.to_json()?)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        root = %bundle.root,
        leaves = dist.len(),
        height = dist.tree().height(),
        total = bundle.total_entitled,
        "distribution built"
    );
    Ok(bundle)
}

/// Load a bundle and check that its root matches its claims.
pub fn load_bundle(path: &Path) -> Result<ProofBundle> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let bundle = ProofBundle::from_json(&text)?;
    Distribution::from_bundle(&bundle)
        .with_context(|| format!("Bundle {} is inconsistent", path.display()))?;
    Ok(bundle)
}

/// Look up one beneficiary's claim in a bundle.
pub fn find_claim(bundle: &ProofBundle, beneficiary: &AccountId) -> Result<ClaimProof> {
    bundle
        .find(beneficiary)
        .cloned()
        .with_context(|| format!("{beneficiary} is not in this distribution"))
}

/// Verify a claim given as raw hex. Malformed hex is an error; well-formed
/// hex of the wrong length is simply an invalid proof.
pub fn verify_hex(
    scheme: &HashScheme,
    root_hex: &str,
    beneficiary: &AccountId,
    amount: u64,
    proof_hex: &[String],
) -> Result<bool> {
    let root = decode_hex(root_hex).context("bad root")?;
    let proof = proof_hex
        .iter()
        .enumerate()
        .map(|(i, p)| decode_hex(p).with_context(|| format!("bad proof entry {i}")))
        .collect::<Result<Vec<_>>>()?;
    let leaf = hash_leaf(scheme, beneficiary, amount);
    Ok(merkle::verify_bytes(scheme, leaf.as_bytes(), &proof, &root))
}

fn decode_hex(s: &str) -> Result<Vec<u8>> {
    Ok(hex::decode(s.trim().trim_start_matches("0x"))?)
}

/// Leaf pre-image and digest, for debugging mismatches with other builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafReport {
    pub preimage: String,
    pub digest: Hash256,
}

pub fn leaf_report(scheme: &HashScheme, beneficiary: &AccountId, amount: u64) -> LeafReport {
    LeafReport {
        preimage: hex::encode(encode_leaf(beneficiary, amount)),
        digest: hash_leaf(scheme, beneficiary, amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn acct(n: u64) -> AccountId {
        AccountId::from_u64(n)
    }

    #[test]
    fn csv_with_header_and_comments() {
        let text = "beneficiary,amount\n# note\n0x01,100\n\n0x02, 250\n";
        let entries = parse_csv(text).unwrap();
        assert_eq!(
            entries,
            vec![Entitlement::new(acct(1), 100), Entitlement::new(acct(2), 250)]
        );
    }

    #[test]
    fn csv_reports_bad_line() {
        let err = parse_csv("0x01,100\n0x02\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        let err = parse_csv("0x01,abc\n").unwrap_err();
        assert!(err.to_string().contains("bad amount"));
    }

    #[test]
    fn build_writes_consistent_bundle() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("entries.json");
        let output = dir.path().join("out").join("bundle.json");
        let entries = vec![
            Entitlement::new(acct(1), 10),
            Entitlement::new(acct(2), 20),
            Entitlement::new(acct(3), 30),
        ];
        fs::write(&input, serde_json::to_string(&entries).unwrap()).unwrap();

        let bundle = build(HashScheme::CANONICAL, &input, &output).unwrap();
        assert_eq!(bundle.total_entitled, 60);

        let loaded = load_bundle(&output).unwrap();
        assert_eq!(loaded, bundle);
        let claim = find_claim(&loaded, &acct(2)).unwrap();
        assert!(claim.verify(&HashScheme::CANONICAL, &loaded.root));
        assert!(find_claim(&loaded, &acct(9)).is_err());
    }

    #[test]
    fn build_from_csv() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("entries.CSV");
        let output = dir.path().join("bundle.json");
        fs::write(&input, "0x0a,5\n0x0b,7\n").unwrap();
        let bundle = build(HashScheme::CANONICAL, &input, &output).unwrap();
        assert_eq!(bundle.claims.len(), 2);
    }

    #[test]
    fn build_rejects_duplicates() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("entries.csv");
        fs::write(&input, "0x0a,5\n0x0a,7\n").unwrap();
        assert!(build(HashScheme::CANONICAL, &input, &dir.path().join("b.json")).is_err());
    }

    #[test]
    fn tampered_bundle_fails_to_load() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("entries.csv");
        let output = dir.path().join("bundle.json");
        fs::write(&input, "0x0a,5\n0x0b,7\n").unwrap();
        let mut bundle = build(HashScheme::CANONICAL, &input, &output).unwrap();
        bundle.claims[1].cumulative_amount = 700;
        fs::write(&output, bundle.to_json().unwrap()).unwrap();
        assert!(load_bundle(&output).is_err());
    }

    #[test]
    fn verify_hex_paths() {
        let s = HashScheme::CANONICAL;
        let dist = Distribution::build(
            s,
            vec![Entitlement::new(acct(1), 10), Entitlement::new(acct(2), 20)],
        )
        .unwrap();
        let claim = dist.proof_for(&acct(1)).unwrap();
        let root = dist.root().to_string();
        let proof: Vec<String> = claim.proof.iter().map(|d| format!("0x{d}")).collect();

        assert!(verify_hex(&s, &root, &acct(1), 10, &proof).unwrap());
        assert!(!verify_hex(&s, &root, &acct(1), 11, &proof).unwrap());

        // Wrong length is an invalid proof, not an error.
        let short = vec![proof[0][..proof[0].len() - 2].to_string()];
        assert!(!verify_hex(&s, &root, &acct(1), 10, &short).unwrap());

        // Non-hex input is an error.
        assert!(verify_hex(&s, &root, &acct(1), 10, &["zz".to_string()]).is_err());
    }

    #[test]
    fn leaf_report_layout() {
        let report = leaf_report(&HashScheme::CANONICAL, &acct(1), 1);
        assert_eq!(report.preimage.len(), 80);
        // ...01 (account) || 01 00 00 00 00 00 00 00 (amount, LE)
        assert!(report.preimage.ends_with("010100000000000000"));
        assert_eq!(report.digest, hash_leaf(&HashScheme::CANONICAL, &acct(1), 1));
    }
}
