use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BannerRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    pub placement: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BannerRow {
    /// Active and inside its (optionally open-ended) display window.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.starts_at.map_or(true, |s| s <= now)
            && self.ends_at.map_or(true, |e| now <= e)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn banner(starts_at: Option<DateTime<Utc>>, ends_at: Option<DateTime<Utc>>) -> BannerRow {
        BannerRow {
            id: Uuid::new_v4(),
            tenant_id: Uuid::new_v4(),
            title: "Spring sale".into(),
            image_url: "https://cdn.example.com/b.png".into(),
            link_url: None,
            placement: "sidebar".into(),
            sort_order: 0,
            is_active: true,
            starts_at,
            ends_at,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_window_is_live() {
        assert!(banner(None, None).is_live(Utc::now()));
    }

    #[test]
    fn test_window_bounds() {
        let now = Utc::now();
        let day = Duration::days(1);
        assert!(banner(Some(now - day), Some(now + day)).is_live(now));
        assert!(!banner(Some(now + day), None).is_live(now));
        assert!(!banner(None, Some(now - day)).is_live(now));
    }

    #[test]
    fn test_inactive_is_never_live() {
        let mut b = banner(None, None);
        b.is_active = false;
        assert!(!b.is_live(Utc::now()));
    }
}
