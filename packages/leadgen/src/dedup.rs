//! Identity resolution and deduplication.
//!
//! Two records denote the same business when their identity keys match
//! exactly (tier 1), or when their names are similar enough and a phone or
//! website corroborates the match (tier 2). The two tiers are separate
//! functions so each can be tuned and tested on its own.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{Lead, RawBusinessRecord, Sector};

/// Address prefix length used when no phone is available for the key.
const ADDRESS_KEY_CHARS: usize = 24;

/// Phone digits compared for identity; ignoring leading digits makes the
/// comparison country-code insensitive.
const PHONE_KEY_DIGITS: usize = 10;

/// Lowercase, whitespace-collapsed form of a business name.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Digits-only phone, truncated to its trailing digits so "+91 44 1234 5678"
/// and "044 1234 5678" agree. None when too short to identify anything.
pub fn normalize_phone(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 5 {
        return None;
    }
    let start = digits.len().saturating_sub(PHONE_KEY_DIGITS);
    Some(digits[start..].to_string())
}

/// Host part of a website URL, scheme and "www." stripped.
pub fn normalize_website(website: &str) -> Option<String> {
    let host = website
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_start_matches("www.");
    let host = host.split(['/', '?']).next().unwrap_or_default().to_lowercase();
    (!host.is_empty()).then_some(host)
}

/// Normalized fingerprint for tier-1 matching: name plus phone when
/// available, else name plus an address prefix, else name alone.
pub fn identity_key(record: &RawBusinessRecord) -> String {
    let name = normalize_name(&record.name);
    if let Some(phone) = record.phone.as_deref().and_then(normalize_phone) {
        return format!("{}|p:{}", name, phone);
    }
    if let Some(address) = record.address.as_deref() {
        let prefix: String = normalize_name(address).chars().take(ADDRESS_KEY_CHARS).collect();
        if !prefix.is_empty() {
            return format!("{}|a:{}", name, prefix);
        }
    }
    name
}

/// Tier 2: are two normalized names close enough to be the same business?
/// Containment covers suffix variants ("apollo skin clinic pvt ltd"); edit
/// distance covers misspellings.
pub fn names_similar(a: &str, b: &str, threshold: f64) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b {
        return true;
    }
    if a.len() >= 5 && b.len() >= 5 && (a.contains(b) || b.contains(a)) {
        return true;
    }
    strsim::normalized_levenshtein(a, b) >= threshold
}

/// Ordered, deduplicated lead collection built by folding raw records in
/// discovery order. Iteration order is the `Vec`, never a hash map, so the
/// result is deterministic for a given input order.
pub struct LeadBook {
    sector: Sector,
    similarity_threshold: f64,
    leads: Vec<Lead>,
    key_index: HashMap<String, usize>,
}

impl LeadBook {
    pub fn new(sector: Sector, similarity_threshold: f64) -> Self {
        Self {
            sector,
            similarity_threshold,
            leads: Vec::new(),
            key_index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.leads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    /// Merge one raw record: enrich an existing lead when either tier
    /// matches, otherwise append a new lead in discovery order.
    pub fn fold(&mut self, record: RawBusinessRecord) {
        if record.name.trim().is_empty() {
            return;
        }

        let key = identity_key(&record);
        let existing = self
            .key_index
            .get(&key)
            .copied()
            .or_else(|| self.find_fuzzy_match(&record));

        match existing {
            Some(index) => {
                debug!(name = %record.name, merged_into = %self.leads[index].name, "Duplicate business absorbed");
                enrich(&mut self.leads[index], record);
                // Alias the duplicate's key to the surviving lead.
                self.key_index.entry(key).or_insert(index);
            }
            None => {
                debug!(name = %record.name, "New lead");
                let index = self.leads.len();
                self.key_index.insert(key, index);
                self.leads.push(Lead::from_record(record, self.sector));
            }
        }
    }

    /// Tier 2 scan: similar name corroborated by an exact phone or website
    /// match. Scans leads in discovery order, so the earliest match wins.
    fn find_fuzzy_match(&self, record: &RawBusinessRecord) -> Option<usize> {
        let name = normalize_name(&record.name);
        let phone = record.phone.as_deref().and_then(normalize_phone);
        let website = record.website.as_deref().and_then(normalize_website);
        if phone.is_none() && website.is_none() {
            return None;
        }

        self.leads.iter().position(|lead| {
            if !names_similar(&name, &normalize_name(&lead.name), self.similarity_threshold) {
                return false;
            }
            let phone_match = match (&phone, lead.phone.as_deref().and_then(normalize_phone)) {
                (Some(a), Some(b)) => *a == b,
                _ => false,
            };
            let website_match = match (&website, lead.website.as_deref().and_then(normalize_website)) {
                (Some(a), Some(b)) => *a == b,
                _ => false,
            };
            phone_match || website_match
        })
    }

    /// Final output: first `max_results` leads in discovery order.
    pub fn into_capped(self, max_results: usize) -> Vec<Lead> {
        let mut leads = self.leads;
        leads.truncate(max_results);
        leads
    }
}

/// Fill any field missing on the lead from the duplicate record. The lead's
/// name and search query are first-discovery-wins and never overwritten.
fn enrich(lead: &mut Lead, record: RawBusinessRecord) {
    if lead.phone.is_none() {
        lead.phone = record.phone;
    }
    if lead.email.is_none() {
        lead.email = record.email;
    }
    if lead.website.is_none() {
        lead.website = record.website;
    }
    if lead.address.is_none() {
        lead.address = record.address;
    }
    if lead.rating.is_none() {
        lead.rating = record.rating;
    }
    if lead.review_count.is_none() {
        lead.review_count = record.review_count;
    }
    if lead.category.is_none() {
        lead.category = record.category;
    }
    if lead.google_maps_url.is_none() {
        lead.google_maps_url = record.map_url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, query: &str) -> RawBusinessRecord {
        RawBusinessRecord {
            name: name.to_string(),
            query: query.to_string(),
            ..Default::default()
        }
    }

    fn book() -> LeadBook {
        LeadBook::new(Sector::Healthcare, 0.85)
    }

    #[test]
    fn phone_normalization_is_country_code_insensitive() {
        assert_eq!(
            normalize_phone("+91 44 1234 5678"),
            normalize_phone("044 1234 5678")
        );
        assert_eq!(normalize_phone("123"), None);
    }

    #[test]
    fn website_normalization_strips_scheme_and_path() {
        assert_eq!(
            normalize_website("https://www.apolloclinic.com/chennai"),
            Some("apolloclinic.com".to_string())
        );
        assert_eq!(
            normalize_website("apolloclinic.com"),
            Some("apolloclinic.com".to_string())
        );
    }

    #[test]
    fn identity_key_prefers_phone_over_address() {
        let mut r = record("Apollo Skin Clinic", "q");
        r.address = Some("12 Greams Road, Chennai".into());
        let address_key = identity_key(&r);
        r.phone = Some("+91 44 1234 5678".into());
        let phone_key = identity_key(&r);

        assert!(address_key.contains("|a:"));
        assert!(phone_key.contains("|p:"));
        assert_ne!(address_key, phone_key);
    }

    #[test]
    fn name_variant_with_same_phone_merges_and_enriches() {
        let mut book = book();

        let mut first = record("Apollo Skin Clinic", "skin clinics in Chennai");
        first.phone = Some("+91 44 1234 5678".into());
        book.fold(first);

        let mut dup = record("Apollo Skin Clinic Pvt Ltd", "dermatologists in Chennai");
        dup.phone = Some("044 1234 5678".into());
        dup.website = Some("https://apolloclinic.com".into());
        book.fold(dup);

        assert_eq!(book.len(), 1);
        let lead = &book.leads()[0];
        assert_eq!(lead.name, "Apollo Skin Clinic");
        // Missing website filled from the duplicate, provenance untouched.
        assert_eq!(lead.website.as_deref(), Some("https://apolloclinic.com"));
        assert_eq!(lead.search_query, "skin clinics in Chennai");
    }

    #[test]
    fn similar_names_without_corroboration_stay_separate() {
        let mut book = book();

        let mut a = record("City Clinic", "clinics in Chennai");
        a.phone = Some("+91 44 1111 1111".into());
        book.fold(a);

        let mut b = record("City Clinic", "clinics in Chennai");
        b.phone = Some("+91 44 2222 2222".into());
        book.fold(b);

        assert_eq!(book.len(), 2);
    }

    #[test]
    fn exact_key_merges_even_without_phone() {
        let mut book = book();

        let mut a = record("Green Leaf Organic Farm", "organic farming");
        a.address = Some("Plot 7, ECR Road, Chennai".into());
        book.fold(a.clone());

        a.email = Some("hello@greenleaf.in".into());
        book.fold(a);

        assert_eq!(book.len(), 1);
        assert_eq!(book.leads()[0].email.as_deref(), Some("hello@greenleaf.in"));
    }

    #[test]
    fn discovery_order_is_preserved_and_capped() {
        let mut book = book();
        for i in 0..6 {
            book.fold(record(&format!("Clinic {}", i), "q"));
        }

        let leads = book.into_capped(4);
        assert_eq!(leads.len(), 4);
        let names: Vec<_> = leads.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Clinic 0", "Clinic 1", "Clinic 2", "Clinic 3"]);
    }

    #[test]
    fn fold_is_deterministic_and_idempotent() {
        let records: Vec<RawBusinessRecord> = (0..5)
            .map(|i| {
                let mut r = record(&format!("Biz {}", i % 3), "q");
                r.phone = Some(format!("+91 44 000 00{:03}", i % 3));
                r
            })
            .collect();

        let run = |records: &[RawBusinessRecord]| {
            let mut book = book();
            for r in records {
                book.fold(r.clone());
            }
            serde_json::to_string(book.leads()).unwrap()
        };

        let first = run(&records);
        let second = run(&records);
        assert_eq!(first, second);

        // Re-folding the book's own output changes nothing.
        let mut book2 = book();
        for r in &records {
            book2.fold(r.clone());
        }
        let before = serde_json::to_string(book2.leads()).unwrap();
        let replay: Vec<RawBusinessRecord> = book2
            .leads()
            .iter()
            .map(|l| RawBusinessRecord {
                name: l.name.clone(),
                phone: l.phone.clone(),
                website: l.website.clone(),
                address: l.address.clone(),
                query: l.search_query.clone(),
                ..Default::default()
            })
            .collect();
        for r in replay {
            book2.fold(r);
        }
        assert_eq!(serde_json::to_string(book2.leads()).unwrap(), before);
    }
}
