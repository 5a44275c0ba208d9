//! Servicio de estadísticas de combustible
//!
//! Agrega los repostajes visibles para el usuario en los 12 meses
//! naturales anteriores (anclados al mes en curso), una entrada por mes
//! etiquetada MM/YY, del más reciente al más antiguo.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use sqlx::PgPool;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::refuel::RefuelStat;
use crate::repositories::refuel_repository::RefuelRepository;
use crate::services::scope_service::refuel_scope;
use crate::utils::errors::AppError;

/// Etiquetas MM/YY de los últimos 12 meses, el mes en curso primero
pub fn trailing_month_labels(today: NaiveDate) -> Vec<String> {
    let mut labels = Vec::with_capacity(12);
    let mut year = today.year();
    let mut month = today.month();
    for _ in 0..12 {
        labels.push(format!("{:02}/{:02}", month, year.rem_euclid(100)));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    labels
}

/// Primer día del mes de hace 11 meses: inicio de la ventana de agregación
pub fn stats_window_start(today: NaiveDate) -> NaiveDate {
    let mut year = today.year();
    let mut month = today.month();
    for _ in 0..11 {
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    NaiveDate::from_ymd_opt(year, month, 1).expect("first day of month is always valid")
}

/// Rellenar las etiquetas con los totales agregados, 0.0 para meses vacíos,
/// redondeado a 2 decimales
pub fn assemble_stats(labels: Vec<String>, totals: &HashMap<String, f64>) -> Vec<RefuelStat> {
    labels
        .into_iter()
        .map(|label| RefuelStat {
            total_fuel: round2(totals.get(&label).copied().unwrap_or(0.0)),
            month_year: label,
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Estadísticas anuales de combustible para los repostajes visibles
/// del usuario
pub async fn yearly_fuel_stats(
    pool: &PgPool,
    user: &AuthenticatedUser,
) -> Result<Vec<RefuelStat>, AppError> {
    let today = Utc::now().date_naive();
    let window_start: DateTime<Utc> = Utc
        .from_utc_datetime(
            &stats_window_start(today)
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always valid"),
        );

    let scope = refuel_scope(user);
    let totals = RefuelRepository::new(pool.clone())
        .monthly_totals(&scope, window_start)
        .await?;

    Ok(assemble_stats(trailing_month_labels(today), &totals))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_exactly_twelve_most_recent_first() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let labels = trailing_month_labels(today);

        assert_eq!(labels.len(), 12);
        assert_eq!(labels[0], "03/25");
        assert_eq!(labels[1], "02/25");
        assert_eq!(labels[11], "04/24");
    }

    #[test]
    fn test_labels_cross_year_boundary_without_gaps() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let labels = trailing_month_labels(today);

        assert_eq!(labels[0], "01/25");
        assert_eq!(labels[1], "12/24");
        assert_eq!(labels[11], "02/24");

        // cada mes exactamente una vez
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn test_window_start_is_first_day_eleven_months_back() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(
            stats_window_start(today),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
        );

        let january = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(
            stats_window_start(january),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }

    #[test]
    fn test_assemble_fills_missing_months_with_zero() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let mut totals = HashMap::new();
        totals.insert("03/25".to_string(), 120.456);
        totals.insert("01/25".to_string(), 80.0);

        let stats = assemble_stats(trailing_month_labels(today), &totals);

        assert_eq!(stats.len(), 12);
        assert_eq!(stats[0].month_year, "03/25");
        assert_eq!(stats[0].total_fuel, 120.46);
        assert_eq!(stats[1].total_fuel, 0.0);
        assert_eq!(stats[2].month_year, "01/25");
        assert_eq!(stats[2].total_fuel, 80.0);
        assert!(stats[3..].iter().all(|s| s.total_fuel == 0.0));
    }

    #[test]
    fn test_rounding_to_two_decimals() {
        assert_eq!(round2(10.456), 10.46);
        assert_eq!(round2(10.454), 10.45);
        assert_eq!(round2(0.0), 0.0);
    }
}
