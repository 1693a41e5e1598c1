//! Venue name canonicalization
//!
//! Maps free-text `booktitle`/`journal` values ("13th USENIX Security
//! Symposium", "Proc. of CCS '07") onto canonical venue names via an ordered
//! keyword table.
//!
//! The whole table is always scanned and a later matching rule overrides an
//! earlier one. That makes rule order a priority mechanism: general rules
//! come first and specific refinements last, so "usenix security" beats the
//! bare "usenix" rule and "eurocrypt" beats "crypto".

use crate::normalize::FieldResult;
use crate::text::strip_field_decoration;

/// One keyword rule: any keyword matching maps the venue to `canonical`
struct VenueRule {
    /// Lowercase keywords, matched as substrings of the lowercased input
    keywords: &'static [&'static str],
    canonical: &'static str,
}

/// Ordered rule table, general rules before specific refinements
static VENUE_RULES: &[VenueRule] = &[
    VenueRule {
        keywords: &["usenix"],
        canonical: "USENIX Annual Technical Conference",
    },
    VenueRule {
        keywords: &["usenix security", "security symposium"],
        canonical: "USENIX Security Symposium",
    },
    VenueRule {
        keywords: &["free and open communications", "foci"],
        canonical: "USENIX Workshop on Free and Open Communications on the Internet",
    },
    VenueRule {
        keywords: &["hot topics in security", "hotsec"],
        canonical: "USENIX Workshop on Hot Topics in Security",
    },
    VenueRule {
        keywords: &["network and distributed system security", "ndss"],
        canonical: "Network and Distributed System Security Symposium",
    },
    VenueRule {
        keywords: &["symposium on security and privacy", "oakland"],
        canonical: "IEEE Symposium on Security and Privacy",
    },
    VenueRule {
        keywords: &["computer and communications security", "ccs"],
        canonical: "ACM Conference on Computer and Communications Security",
    },
    VenueRule {
        keywords: &["crypto"],
        canonical: "International Cryptology Conference",
    },
    VenueRule {
        keywords: &["eurocrypt"],
        canonical: "International Conference on the Theory and Applications of Cryptographic Techniques",
    },
    VenueRule {
        keywords: &["financial cryptography"],
        canonical: "Financial Cryptography and Data Security",
    },
    VenueRule {
        keywords: &["privacy enhancing technologies", "pets"],
        canonical: "Privacy Enhancing Technologies Symposium",
    },
    VenueRule {
        keywords: &["privacy in the electronic society", "wpes"],
        canonical: "ACM Workshop on Privacy in the Electronic Society",
    },
    VenueRule {
        keywords: &["information hiding"],
        canonical: "Information Hiding Workshop",
    },
    VenueRule {
        keywords: &["sigcomm"],
        canonical: "ACM SIGCOMM Conference",
    },
    VenueRule {
        keywords: &["internet measurement", "imc"],
        canonical: "ACM Internet Measurement Conference",
    },
    VenueRule {
        keywords: &["hot topics in networks", "hotnets"],
        canonical: "ACM Workshop on Hot Topics in Networks",
    },
    VenueRule {
        keywords: &["communications of the acm", "cacm"],
        canonical: "Communications of the ACM",
    },
    VenueRule {
        keywords: &["information and system security", "tissec"],
        canonical: "ACM Transactions on Information and System Security",
    },
];

/// Map a raw venue field onto its canonical name.
///
/// The input is sanitized first. No rule matching means the venue is unknown
/// to the table and the (sanitized) original comes back flagged for review;
/// any match comes back clean, whether or not the name actually changed.
pub fn match_venue(raw: &str) -> FieldResult {
    let venue = strip_field_decoration(raw);
    let haystack = venue.to_lowercase();

    let mut best_match = None;
    for rule in VENUE_RULES {
        if rule.keywords.iter().any(|k| haystack.contains(k)) {
            best_match = Some(rule.canonical);
        }
    }

    match best_match {
        Some(canonical) => FieldResult::ok(canonical),
        None => FieldResult::flagged(venue),
    }
}
