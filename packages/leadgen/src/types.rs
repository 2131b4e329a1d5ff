use serde::{Deserialize, Serialize};

// ============================================================================
// SECTORS
// ============================================================================

/// Industry sectors a search can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sector {
    Healthcare,
    #[serde(rename = "Real Estate")]
    RealEstate,
    Manufacturing,
    #[serde(rename = "IT & Technology")]
    ItTechnology,
    #[serde(rename = "Education & Training")]
    EducationTraining,
    #[serde(rename = "Legal Services")]
    LegalServices,
    #[serde(rename = "Financial Services")]
    FinancialServices,
    #[serde(rename = "Hospitality & Tourism")]
    HospitalityTourism,
    #[serde(rename = "Retail & E-commerce")]
    RetailEcommerce,
    #[serde(rename = "Food & Beverage")]
    FoodBeverage,
    Construction,
    Automotive,
    #[serde(rename = "Marketing & Advertising")]
    MarketingAdvertising,
    Consulting,
    #[serde(rename = "Logistics & Transportation")]
    LogisticsTransportation,
    #[serde(rename = "Beauty & Wellness")]
    BeautyWellness,
    #[serde(rename = "Entertainment & Media")]
    EntertainmentMedia,
    Agriculture,
    #[serde(rename = "Energy & Utilities")]
    EnergyUtilities,
    Telecommunications,
    Insurance,
    #[serde(rename = "Professional Services")]
    ProfessionalServices,
    #[serde(rename = "Non-Profit & NGO")]
    NonProfitNgo,
    #[serde(rename = "Sports & Fitness")]
    SportsFitness,
}

impl Sector {
    /// All recognized sectors, in canonical order.
    pub const ALL: [Sector; 24] = [
        Sector::Healthcare,
        Sector::RealEstate,
        Sector::Manufacturing,
        Sector::ItTechnology,
        Sector::EducationTraining,
        Sector::LegalServices,
        Sector::FinancialServices,
        Sector::HospitalityTourism,
        Sector::RetailEcommerce,
        Sector::FoodBeverage,
        Sector::Construction,
        Sector::Automotive,
        Sector::MarketingAdvertising,
        Sector::Consulting,
        Sector::LogisticsTransportation,
        Sector::BeautyWellness,
        Sector::EntertainmentMedia,
        Sector::Agriculture,
        Sector::EnergyUtilities,
        Sector::Telecommunications,
        Sector::Insurance,
        Sector::ProfessionalServices,
        Sector::NonProfitNgo,
        Sector::SportsFitness,
    ];

    /// Canonical display name (also the serde wire name).
    pub fn name(&self) -> &'static str {
        match self {
            Sector::Healthcare => "Healthcare",
            Sector::RealEstate => "Real Estate",
            Sector::Manufacturing => "Manufacturing",
            Sector::ItTechnology => "IT & Technology",
            Sector::EducationTraining => "Education & Training",
            Sector::LegalServices => "Legal Services",
            Sector::FinancialServices => "Financial Services",
            Sector::HospitalityTourism => "Hospitality & Tourism",
            Sector::RetailEcommerce => "Retail & E-commerce",
            Sector::FoodBeverage => "Food & Beverage",
            Sector::Construction => "Construction",
            Sector::Automotive => "Automotive",
            Sector::MarketingAdvertising => "Marketing & Advertising",
            Sector::Consulting => "Consulting",
            Sector::LogisticsTransportation => "Logistics & Transportation",
            Sector::BeautyWellness => "Beauty & Wellness",
            Sector::EntertainmentMedia => "Entertainment & Media",
            Sector::Agriculture => "Agriculture",
            Sector::EnergyUtilities => "Energy & Utilities",
            Sector::Telecommunications => "Telecommunications",
            Sector::Insurance => "Insurance",
            Sector::ProfessionalServices => "Professional Services",
            Sector::NonProfitNgo => "Non-Profit & NGO",
            Sector::SportsFitness => "Sports & Fitness",
        }
    }

    /// Parse a sector from its display name, case-insensitively.
    pub fn parse(s: &str) -> Option<Sector> {
        let needle = s.trim();
        Sector::ALL
            .into_iter()
            .find(|sector| sector.name().eq_ignore_ascii_case(needle))
    }

    /// Default search keywords, used for prompt context and for the
    /// deterministic template fallback when the LLM produces nothing usable.
    pub fn default_keywords(&self) -> &'static [&'static str] {
        match self {
            Sector::Healthcare => &[
                "Doctors",
                "Clinics",
                "Hospitals",
                "Medical Centers",
                "Specialists",
                "Dentists",
                "Physiotherapy",
                "Diagnostic Centers",
            ],
            Sector::RealEstate => &[
                "Real Estate Agents",
                "Property Developers",
                "Realtors",
                "Real Estate Companies",
                "Property Consultants",
                "Builders",
            ],
            Sector::Manufacturing => &[
                "Manufacturing Companies",
                "Factories",
                "Industrial Units",
                "Production Facilities",
                "OEM Manufacturers",
            ],
            Sector::ItTechnology => &[
                "IT Companies",
                "Software Companies",
                "Tech Startups",
                "Web Development",
                "App Development",
                "IT Services",
                "Cloud Services",
            ],
            Sector::EducationTraining => &[
                "Schools",
                "Colleges",
                "Universities",
                "Training Centers",
                "Coaching Classes",
                "Online Education",
                "Tutors",
            ],
            Sector::LegalServices => &[
                "Lawyers",
                "Law Firms",
                "Legal Consultants",
                "Attorneys",
                "Advocates",
                "Legal Advisors",
            ],
            Sector::FinancialServices => &[
                "Banks",
                "Financial Advisors",
                "Investment Firms",
                "Accounting Firms",
                "Tax Consultants",
                "Financial Planners",
            ],
            Sector::HospitalityTourism => &[
                "Hotels",
                "Resorts",
                "Travel Agencies",
                "Tour Operators",
                "Restaurants",
                "Guest Houses",
                "Holiday Packages",
            ],
            Sector::RetailEcommerce => &[
                "Retail Stores",
                "Shopping Centers",
                "Online Stores",
                "E-commerce",
                "Supermarkets",
                "Outlets",
            ],
            Sector::FoodBeverage => &[
                "Restaurants",
                "Cafes",
                "Food Delivery",
                "Catering Services",
                "Bakeries",
                "Cloud Kitchens",
                "Food Manufacturers",
            ],
            Sector::Construction => &[
                "Construction Companies",
                "Contractors",
                "Builders",
                "Civil Engineers",
                "Architecture Firms",
                "Interior Designers",
            ],
            Sector::Automotive => &[
                "Car Dealers",
                "Auto Repair",
                "Car Service Centers",
                "Vehicle Sales",
                "Auto Parts",
                "Garages",
            ],
            Sector::MarketingAdvertising => &[
                "Marketing Agencies",
                "Advertising Firms",
                "Digital Marketing",
                "SEO Services",
                "Creative Agencies",
                "PR Firms",
            ],
            Sector::Consulting => &[
                "Business Consultants",
                "Management Consulting",
                "Strategy Consulting",
                "HR Consultants",
                "Advisory Services",
            ],
            Sector::LogisticsTransportation => &[
                "Logistics Companies",
                "Freight Forwarders",
                "Courier Services",
                "Transportation Services",
                "Warehousing",
            ],
            Sector::BeautyWellness => &[
                "Beauty Salons",
                "Spas",
                "Wellness Centers",
                "Gyms",
                "Yoga Studios",
                "Beauty Parlors",
                "Cosmetics",
            ],
            Sector::EntertainmentMedia => &[
                "Event Planners",
                "Production Houses",
                "Media Companies",
                "Photography Studios",
                "Entertainment Services",
            ],
            Sector::Agriculture => &[
                "Agricultural Services",
                "Farming Equipment",
                "Agro Products",
                "Organic Farming",
                "Agricultural Consultants",
            ],
            Sector::EnergyUtilities => &[
                "Solar Companies",
                "Energy Consultants",
                "Utility Services",
                "Renewable Energy",
                "Power Solutions",
            ],
            Sector::Telecommunications => &[
                "Telecom Companies",
                "Network Providers",
                "Internet Services",
                "Broadband Providers",
                "Mobile Services",
            ],
            Sector::Insurance => &[
                "Insurance Companies",
                "Insurance Agents",
                "Insurance Brokers",
                "Life Insurance",
                "Health Insurance",
            ],
            Sector::ProfessionalServices => &[
                "Business Services",
                "Corporate Services",
                "Document Services",
                "Translation Services",
                "Notary Services",
            ],
            Sector::NonProfitNgo => &[
                "NGOs",
                "Charitable Organizations",
                "Non-Profit Organizations",
                "Foundations",
                "Social Services",
            ],
            Sector::SportsFitness => &[
                "Fitness Centers",
                "Sports Clubs",
                "Personal Trainers",
                "Sports Equipment",
                "Martial Arts",
                "Dance Studios",
            ],
        }
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// REQUEST
// ============================================================================

/// A lead discovery request. At least one location field should be present
/// to keep the search scoped (and cheap), but none is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub sector: Sector,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_max_results() -> u32 {
    10
}

impl SearchRequest {
    pub fn new(sector: Sector) -> Self {
        Self {
            sector,
            country: None,
            state: None,
            city: None,
            postcode: None,
            keyword: None,
            max_results: default_max_results(),
        }
    }

    /// Location fields in specificity order (broadest first), blanks dropped.
    pub fn location_fields(&self) -> Vec<&str> {
        [&self.country, &self.state, &self.city, &self.postcode]
            .into_iter()
            .filter_map(|f| f.as_deref())
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect()
    }

    /// User keyword with surrounding whitespace dropped, if non-blank.
    pub fn trimmed_keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

// ============================================================================
// QUERIES & RECORDS
// ============================================================================

/// Where a candidate query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuerySource {
    /// Produced by the LLM and validated.
    Generated,
    /// Produced by the deterministic template fallback.
    Template,
}

/// One search query ready for the search service: the base phrase, the
/// location qualifiers appended to it, and its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateQuery {
    /// The full query text handed to the search service.
    pub text: String,
    /// The phrase before location qualifiers were appended.
    pub phrase: String,
    pub source: QuerySource,
}

/// A raw business record as returned by the search service for one query.
/// Any field other than the name may be absent. Ephemeral: these exist only
/// until they are folded into the deduplicated lead set.
#[derive(Debug, Clone, Default)]
pub struct RawBusinessRecord {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub category: Option<String>,
    pub map_url: Option<String>,
    /// The query that produced this record. Assigned by the executor.
    pub query: String,
}

// ============================================================================
// OUTPUT
// ============================================================================

/// A deduplicated business lead, in final output form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub name: String,
    pub sector: Sector,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub category: Option<String>,
    pub google_maps_url: Option<String>,
    /// The query that first discovered this lead. Never overwritten by
    /// later duplicates.
    pub search_query: String,
}

impl Lead {
    pub fn from_record(record: RawBusinessRecord, sector: Sector) -> Self {
        Self {
            name: record.name,
            sector,
            phone: record.phone,
            email: record.email,
            website: record.website,
            address: record.address,
            rating: record.rating,
            review_count: record.review_count,
            category: record.category,
            google_maps_url: record.map_url,
            search_query: record.query,
        }
    }
}

/// Summary of one completed discovery run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Deduplicated leads in discovery order, capped at `max_results`.
    pub leads: Vec<Lead>,
    /// The queries the synthesizer produced, in execution order.
    pub queries: Vec<CandidateQuery>,
    pub calls_attempted: usize,
    pub calls_failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_parses_display_names_case_insensitively() {
        assert_eq!(Sector::parse("healthcare"), Some(Sector::Healthcare));
        assert_eq!(Sector::parse("IT & technology"), Some(Sector::ItTechnology));
        assert_eq!(Sector::parse(" Non-Profit & NGO "), Some(Sector::NonProfitNgo));
        assert_eq!(Sector::parse("Astrology"), None);
    }

    #[test]
    fn sector_serde_round_trips_display_names() {
        for sector in Sector::ALL {
            let json = serde_json::to_string(&sector).unwrap();
            assert_eq!(json, format!("\"{}\"", sector.name()));
            let back: Sector = serde_json::from_str(&json).unwrap();
            assert_eq!(back, sector);
        }
    }

    #[test]
    fn every_sector_has_default_keywords() {
        for sector in Sector::ALL {
            assert!(!sector.default_keywords().is_empty(), "{}", sector);
        }
    }

    #[test]
    fn request_defaults_max_results_to_ten() {
        let request: SearchRequest =
            serde_json::from_str(r#"{"sector": "Healthcare", "city": "Chennai"}"#).unwrap();
        assert_eq!(request.max_results, 10);
        assert_eq!(request.location_fields(), vec!["Chennai"]);
    }

    #[test]
    fn location_fields_drop_blanks_and_keep_specificity_order() {
        let mut request = SearchRequest::new(Sector::Healthcare);
        request.country = Some("India".into());
        request.state = Some("  ".into());
        request.city = Some("Chennai".into());
        request.postcode = Some("600001".into());

        assert_eq!(request.location_fields(), vec!["India", "Chennai", "600001"]);
    }

    #[test]
    fn lead_serializes_camel_case() {
        let lead = Lead {
            name: "Apollo Skin Clinic".into(),
            sector: Sector::Healthcare,
            phone: None,
            email: None,
            website: None,
            address: None,
            rating: Some(4.5),
            review_count: Some(120),
            category: None,
            google_maps_url: Some("https://maps.google.com/?cid=1".into()),
            search_query: "skin clinics in Chennai".into(),
        };
        let json = serde_json::to_value(&lead).unwrap();

        assert_eq!(json["reviewCount"], 120);
        assert_eq!(json["googleMapsUrl"], "https://maps.google.com/?cid=1");
        assert_eq!(json["searchQuery"], "skin clinics in Chennai");
        assert_eq!(json["sector"], "Healthcare");
    }
}
