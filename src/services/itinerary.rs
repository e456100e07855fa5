//! Day-by-day itinerary.

use std::sync::Arc;

use chrono::NaiveDate;
use uuid::Uuid;

use super::{caller, optional_text, required_text};
use crate::error::Result;
use crate::interfaces::RowStore;
use crate::model::{ItineraryEntry, ItineraryItem, NewItineraryItem};
use crate::repository::Repository;

/// Activities planned for one date, in start-time order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub items: Vec<ItineraryItem>,
}

/// Every date from `start` to `end`, both included. Empty when `end`
/// precedes `start`.
pub fn trip_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

#[derive(Clone)]
pub struct ItineraryService {
    me: Uuid,
    items: Repository<ItineraryItem>,
}

impl ItineraryService {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self {
            me: caller(&store),
            items: Repository::new(store),
        }
    }

    #[tracing::instrument(name = "itinerary.add", skip_all, fields(group_id = %group_id))]
    pub async fn add(&self, group_id: Uuid, entry: ItineraryEntry) -> Result<ItineraryItem> {
        let title = required_text("title", &entry.title, "Please enter a title")?;
        self.items
            .insert(&NewItineraryItem {
                group_id,
                user_id: self.me,
                day_date: entry.day_date,
                start_time: entry.start_time,
                end_time: entry.end_time,
                title,
                description: optional_text(entry.description.as_deref()),
                location: optional_text(entry.location.as_deref()),
                category: optional_text(entry.category.as_deref()),
            })
            .await
    }

    pub async fn remove(&self, item_id: Uuid) -> Result<()> {
        self.items.delete(item_id).await
    }

    pub async fn list(&self, group_id: Uuid) -> Result<Vec<ItineraryItem>> {
        self.items.list_by_group(group_id).await
    }

    /// Items grouped by date. Untimed items lead their day.
    pub async fn by_day(&self, group_id: Uuid) -> Result<Vec<DayPlan>> {
        let mut days: Vec<DayPlan> = Vec::new();
        for item in self.list(group_id).await? {
            match days.last_mut() {
                Some(day) if day.date == item.day_date => day.items.push(item),
                _ => days.push(DayPlan {
                    date: item.day_date,
                    items: vec![item],
                }),
            }
        }
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncError;
    use crate::test_utils::Sandbox;
    use chrono::NaiveTime;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, day).unwrap()
    }

    fn at(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    #[test]
    fn test_trip_days_inclusive() {
        assert_eq!(trip_days(date(1), date(3)), vec![date(1), date(2), date(3)]);
        assert_eq!(trip_days(date(5), date(5)), vec![date(5)]);
        assert!(trip_days(date(5), date(4)).is_empty());
    }

    #[tokio::test]
    async fn test_by_day_groups_and_orders() {
        let sandbox = Sandbox::new();
        let asha = sandbox.sign_up("asha@example.com", None).await;
        let group = sandbox.group(&asha, "Kerala", None).await;
        let itinerary = sandbox.services(&asha).itinerary();

        itinerary
            .add(group.id, ItineraryEntry::new(date(2), "Houseboat").at(at(14), None))
            .await
            .unwrap();
        itinerary
            .add(group.id, ItineraryEntry::new(date(1), "Fort Kochi walk").at(at(9), Some(at(11))))
            .await
            .unwrap();
        itinerary
            .add(group.id, ItineraryEntry::new(date(2), "Breakfast").at(at(8), None))
            .await
            .unwrap();
        itinerary
            .add(group.id, ItineraryEntry::new(date(2), "Pack bags"))
            .await
            .unwrap();

        let days = itinerary.by_day(group.id).await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(1));
        let second: Vec<&str> = days[1].items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(second, vec!["Pack bags", "Breakfast", "Houseboat"]);
    }

    #[tokio::test]
    async fn test_end_before_start_is_kept() {
        let sandbox = Sandbox::new();
        let asha = sandbox.sign_up("asha@example.com", None).await;
        let group = sandbox.group(&asha, "Kerala", None).await;
        let itinerary = sandbox.services(&asha).itinerary();

        let item = itinerary
            .add(group.id, ItineraryEntry::new(date(1), "Night bus").at(at(22), Some(at(6))))
            .await
            .unwrap();
        assert_eq!(item.end_time, Some(at(6)));
    }

    #[tokio::test]
    async fn test_blank_title_and_remove() {
        let sandbox = Sandbox::new();
        let asha = sandbox.sign_up("asha@example.com", None).await;
        let group = sandbox.group(&asha, "Kerala", None).await;
        let itinerary = sandbox.services(&asha).itinerary();

        let err = itinerary
            .add(group.id, ItineraryEntry::new(date(1), "  "))
            .await
            .unwrap_err();
        assert!(matches!(err, SyncError::Validation { field: "title", .. }));

        let item = itinerary
            .add(group.id, ItineraryEntry::new(date(1), "Beach"))
            .await
            .unwrap();
        itinerary.remove(item.id).await.unwrap();
        assert!(itinerary.list(group.id).await.unwrap().is_empty());

        let err = itinerary.remove(item.id).await.unwrap_err();
        assert!(matches!(err, SyncError::NotFound { .. }));
    }
}
