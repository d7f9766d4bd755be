//! Pure validation helpers shared by the donation engine.
//!
//! No side effects, no store access. Every mutating operation runs these
//! before touching the store, so a failed validation leaves it untouched.

use chrono::{DateTime, Utc};

use super::donation::FoodItem;
use super::geo::Point;
use crate::errors::{AppError, AppResult};

/// A donation must list at least one food item, and every item needs a
/// non-blank name and quantity.
pub fn food_items(items: &[FoodItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::validation("at least one food item is required"));
    }
    if items
        .iter()
        .any(|item| item.name.trim().is_empty() || item.quantity.trim().is_empty())
    {
        return Err(AppError::validation(
            "every food item needs a name and a quantity",
        ));
    }
    Ok(())
}

pub fn serves(serves: i32) -> AppResult<()> {
    if serves > 0 {
        Ok(())
    } else {
        Err(AppError::validation("serves must be a positive number"))
    }
}

/// `now` is passed in explicitly so the check stays a pure function.
pub fn pickup_deadline(pickup_by: DateTime<Utc>, now: DateTime<Utc>) -> AppResult<()> {
    if pickup_by > now {
        Ok(())
    } else {
        Err(AppError::validation(
            "pickup deadline must be in the future",
        ))
    }
}

pub fn location(point: &Point) -> AppResult<()> {
    if point.is_valid() {
        Ok(())
    } else {
        Err(AppError::validation(
            "location coordinates are out of range",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(name: &str, quantity: &str) -> FoodItem {
        FoodItem {
            name: name.to_string(),
            quantity: quantity.to_string(),
        }
    }

    #[test]
    fn food_items_rejects_empty_list() {
        assert!(food_items(&[]).is_err());
    }

    #[test]
    fn food_items_rejects_blank_fields() {
        assert!(food_items(&[item("Rice", " ")]).is_err());
        assert!(food_items(&[item("", "5 kg")]).is_err());
        assert!(food_items(&[item("Rice", "5 kg"), item(" ", "2")]).is_err());
    }

    #[test]
    fn food_items_accepts_filled_entries() {
        assert!(food_items(&[item("Rice", "5 kg"), item("Dal", "20 packets")]).is_ok());
    }

    #[test]
    fn serves_must_be_positive() {
        assert!(serves(1).is_ok());
        assert!(serves(250).is_ok());
        assert!(serves(0).is_err());
        assert!(serves(-3).is_err());
    }

    #[test]
    fn pickup_deadline_must_be_in_the_future() {
        let now = Utc::now();
        assert!(pickup_deadline(now + Duration::hours(2), now).is_ok());
        assert!(pickup_deadline(now, now).is_err());
        assert!(pickup_deadline(now - Duration::minutes(1), now).is_err());
    }

    #[test]
    fn location_checks_coordinate_ranges() {
        assert!(location(&Point::new(77.0, 12.9)).is_ok());
        assert!(location(&Point::new(-180.0, 90.0)).is_ok());
        assert!(location(&Point::new(181.0, 0.0)).is_err());
        assert!(location(&Point::new(0.0, -90.1)).is_err());
        assert!(location(&Point::new(f64::NAN, 0.0)).is_err());
    }
}
