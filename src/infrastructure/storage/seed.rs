//! Default catalog loaded at startup when the store is empty.

use tracing::info;

use crate::domain::{DomainResult, ServiceItemDraft, ServiceRepository};

/// `(service, name, descriptions)`; seeded items start unrated with no images.
const DEFAULT_SERVICES: &[(&str, &str, &[&str])] = &[
    ("Hair Styling & Braiding", "Knotless Braids", &["Small", "Medium", "Large"]),
    ("Hair Styling & Braiding", "Wig Install", &["Closure", "Frontal"]),
    ("Makeup", "Soft Glam", &["Day", "Evening"]),
    ("Makeup", "Bridal Makeup", &["Bride", "Bridesmaid"]),
    ("Nails", "Gel Manicure", &["Short", "Medium", "Long"]),
    ("Nails", "Acrylic Full Set", &["Short", "Medium", "Long"]),
];

pub fn default_services() -> Vec<ServiceItemDraft> {
    DEFAULT_SERVICES
        .iter()
        .map(|(service, name, descriptions)| ServiceItemDraft {
            service: service.to_string(),
            name: name.to_string(),
            descriptions: descriptions.iter().map(|d| d.to_string()).collect(),
            images: Vec::new(),
            rating: 0.0,
        })
        .collect()
}

pub async fn seed_services(repo: &dyn ServiceRepository) -> DomainResult<usize> {
    let drafts = default_services();
    let count = drafts.len();
    for draft in drafts {
        repo.create(draft).await?;
    }
    info!(count, "Seeded default services");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryServiceRepository;

    #[tokio::test]
    async fn seeds_six_services_with_variants() {
        let repo = InMemoryServiceRepository::new();
        assert_eq!(seed_services(&repo).await.unwrap(), 6);

        let braids = repo.get(1).await.unwrap();
        assert_eq!(braids.name, "Knotless Braids");
        assert!(braids.offers("Medium"));
        let acrylic = repo.get(6).await.unwrap();
        assert_eq!(acrylic.descriptions.len(), 3);
    }
}
