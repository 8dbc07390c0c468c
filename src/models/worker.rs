use serde::{Deserialize, Serialize};

/// Canonical worker record as shown in the listing.
///
/// Identity carries both email and phone; file attachments (photo, business
/// certificate, ID card sides) ride a multipart submission and come back as
/// URLs.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Worker {
    pub id: String,

    // Personal info
    #[serde(default)]
    pub profile_photo: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub residential_address: Option<String>,
    #[serde(default)]
    pub digital_address: Option<String>,
    #[serde(default)]
    pub bio: String,

    // Profession
    pub primary_profession: String,
    #[serde(default)]
    pub secondary_profession: Option<String>,
    #[serde(default)]
    pub business_certificate: Option<String>,

    // Identification
    #[serde(default)]
    pub id_card_type: String,
    #[serde(default)]
    pub id_card_front: Option<String>,
    #[serde(default)]
    pub id_card_back: Option<String>,

    // Additional info
    #[serde(default)]
    pub status: WorkerStatus,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub completed_jobs: u32,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub is_available: bool,
    #[serde(default)]
    pub verified_worker: bool,
    #[serde(default)]
    pub premium_service: bool,
    #[serde(default)]
    pub join_date: String,
}

impl Worker {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive substring match over name, email, phone and both
    /// professions.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.full_name().to_lowercase().contains(&term)
            || self.email.to_lowercase().contains(&term)
            || self.phone.to_lowercase().contains(&term)
            || self.primary_profession.to_lowercase().contains(&term)
            || self
                .secondary_profession
                .as_ref()
                .is_some_and(|p| p.to_lowercase().contains(&term))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum WorkerStatus {
    #[default]
    Active,
    Inactive,
    #[serde(rename = "on-leave")]
    OnLeave,
}

impl WorkerStatus {
    pub fn label(&self) -> &'static str {
        match self {
            WorkerStatus::Active => "Active",
            WorkerStatus::Inactive => "Inactive",
            WorkerStatus::OnLeave => "On leave",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            WorkerStatus::Active => "status-active",
            WorkerStatus::Inactive => "status-inactive",
            WorkerStatus::OnLeave => "status-on-leave",
        }
    }
}

/// Status-filter options offered by the list header dropdown.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum WorkerFilter {
    #[default]
    All,
    Active,
    Inactive,
    OnLeave,
    Online,
    Verified,
    Premium,
}

impl WorkerFilter {
    pub const ALL: [WorkerFilter; 7] = [
        WorkerFilter::All,
        WorkerFilter::Active,
        WorkerFilter::Inactive,
        WorkerFilter::OnLeave,
        WorkerFilter::Online,
        WorkerFilter::Verified,
        WorkerFilter::Premium,
    ];

    pub fn value(&self) -> &'static str {
        match self {
            WorkerFilter::All => "all",
            WorkerFilter::Active => "active",
            WorkerFilter::Inactive => "inactive",
            WorkerFilter::OnLeave => "on-leave",
            WorkerFilter::Online => "online",
            WorkerFilter::Verified => "verified",
            WorkerFilter::Premium => "premium",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WorkerFilter::All => "All workers",
            WorkerFilter::Active => "Active",
            WorkerFilter::Inactive => "Inactive",
            WorkerFilter::OnLeave => "On leave",
            WorkerFilter::Online => "Online",
            WorkerFilter::Verified => "Verified",
            WorkerFilter::Premium => "Premium",
        }
    }

    pub fn from_value(value: &str) -> WorkerFilter {
        Self::ALL
            .into_iter()
            .find(|f| f.value() == value)
            .unwrap_or(WorkerFilter::All)
    }

    pub fn matches(&self, worker: &Worker) -> bool {
        match self {
            WorkerFilter::All => true,
            WorkerFilter::Active => worker.status == WorkerStatus::Active,
            WorkerFilter::Inactive => worker.status == WorkerStatus::Inactive,
            WorkerFilter::OnLeave => worker.status == WorkerStatus::OnLeave,
            WorkerFilter::Online => worker.is_online,
            WorkerFilter::Verified => worker.verified_worker,
            WorkerFilter::Premium => worker.premium_service,
        }
    }
}

/// Apply search term and status filter to the full worker list.
pub fn filter_workers<'a>(
    workers: &'a [Worker],
    term: &str,
    filter: WorkerFilter,
) -> Vec<&'a Worker> {
    workers
        .iter()
        .filter(|w| w.matches_search(term) && filter.matches(w))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worker(first: &str, last: &str, email: &str, profession: &str) -> Worker {
        Worker {
            id: format!("w-{}", first.to_lowercase()),
            profile_photo: None,
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone: "+233 24 123 4567".to_string(),
            residential_address: None,
            digital_address: None,
            bio: String::new(),
            primary_profession: profession.to_string(),
            secondary_profession: None,
            business_certificate: None,
            id_card_type: "Ghana Card".to_string(),
            id_card_front: None,
            id_card_back: None,
            status: WorkerStatus::Active,
            rating: 4.5,
            completed_jobs: 10,
            is_online: false,
            is_available: true,
            verified_worker: false,
            premium_service: false,
            join_date: "2023-01-01".to_string(),
        }
    }

    #[test]
    fn search_matches_name_case_insensitively() {
        let w = worker("John", "Smith", "john.smith@email.com", "Electrician");
        assert!(w.matches_search("john sm"));
        assert!(w.matches_search("SMITH"));
        assert!(!w.matches_search("sarah"));
    }

    #[test]
    fn search_matches_email_phone_and_professions() {
        let mut w = worker("John", "Smith", "john.smith@email.com", "Electrician");
        w.secondary_profession = Some("Solar Panel Installer".to_string());
        assert!(w.matches_search("@email.com"));
        assert!(w.matches_search("123 4567"));
        assert!(w.matches_search("electric"));
        assert!(w.matches_search("solar"));
    }

    #[test]
    fn empty_search_matches_everything() {
        let w = worker("John", "Smith", "john@email.com", "Electrician");
        assert!(w.matches_search(""));
    }

    #[test]
    fn status_filter_distinguishes_flags_from_status() {
        let mut online = worker("Ama", "Mensah", "ama@email.com", "Designer");
        online.is_online = true;
        online.status = WorkerStatus::OnLeave;

        assert!(WorkerFilter::Online.matches(&online));
        assert!(WorkerFilter::OnLeave.matches(&online));
        assert!(!WorkerFilter::Active.matches(&online));
    }

    #[test]
    fn filter_workers_combines_search_and_status() {
        let mut a = worker("John", "Smith", "john@email.com", "Electrician");
        a.verified_worker = true;
        let b = worker("Jane", "Smith", "jane@email.com", "Plumber");

        let workers = vec![a, b];
        let hits = filter_workers(&workers, "smith", WorkerFilter::Verified);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].first_name, "John");

        let hits = filter_workers(&workers, "smith", WorkerFilter::All);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn status_round_trips_through_serde() {
        let json = serde_json::to_string(&WorkerStatus::OnLeave).unwrap();
        assert_eq!(json, "\"on-leave\"");
        let back: WorkerStatus = serde_json::from_str("\"on-leave\"").unwrap();
        assert_eq!(back, WorkerStatus::OnLeave);
    }

    #[test]
    fn filter_round_trips_through_values() {
        for f in WorkerFilter::ALL {
            assert_eq!(WorkerFilter::from_value(f.value()), f);
        }
        assert_eq!(WorkerFilter::from_value("nonsense"), WorkerFilter::All);
    }
}
