use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::ProfileSeed;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Alan", "Barbara", "Claude", "Dennis", "Edsger", "Frances", "Grace", "Hedy",
    "Ivan", "Joan", "John", "Katherine", "Ken", "Leslie", "Margaret", "Niklaus", "Radia",
    "Shafi", "Sophie", "Tim", "Whitfield", "Xiaoyun", "Yukihiro",
];

const LAST_NAMES: &[&str] = &[
    "Allen", "Backus", "Cerf", "Diffie", "Engelbart", "Floyd", "Goldwasser", "Hamilton",
    "Hopper", "Johnson", "Kay", "Lamport", "Liskov", "Lovelace", "Perlman", "Ritchie",
    "Shannon", "Sutherland", "Thompson", "Turing", "Wang", "Wilson", "Wirth", "Matsumoto",
];

/// Draws random first/last names and derives an email hint from them
#[derive(Debug, Clone)]
pub struct SeedGenerator {
    email_domain: String,
}

impl SeedGenerator {
    pub fn new(email_domain: impl Into<String>) -> Self {
        Self {
            email_domain: email_domain.into(),
        }
    }

    pub fn generate(&self) -> ProfileSeed {
        let mut rng = OsRng;
        let first_name = FIRST_NAMES.choose(&mut rng).copied().unwrap_or("Ada");
        let last_name = LAST_NAMES.choose(&mut rng).copied().unwrap_or("Lovelace");
        let suffix: u16 = rng.gen_range(1000..10000);

        ProfileSeed {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email_hint: format!(
                "{}.{}.{suffix}@{}",
                email_local_part(first_name),
                email_local_part(last_name),
                self.email_domain
            ),
        }
    }
}

/// Lowercased ASCII alphanumerics only
fn email_local_part(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
