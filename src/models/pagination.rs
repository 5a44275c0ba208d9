//! Paginación de listados
//!
//! Página por defecto de 15 elementos, máximo 100.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: i64 = 15;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Página de resultados para la API
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, size: i64) -> Self {
        let pages = if total == 0 { 0 } else { (total + size - 1) / size };
        Self {
            items,
            total,
            page,
            size,
            pages,
        }
    }
}

/// Normalizar los parámetros de página recibidos en la query string.
/// Devuelve (page, size, offset).
pub fn resolve_page(page: Option<i64>, size: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let size = size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = (page - 1) * size;
    (page, size, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_page_defaults() {
        assert_eq!(resolve_page(None, None), (1, 15, 0));
    }

    #[test]
    fn test_resolve_page_clamps_size() {
        assert_eq!(resolve_page(Some(2), Some(500)), (2, 100, 100));
        assert_eq!(resolve_page(Some(2), Some(0)), (2, 1, 1));
    }

    #[test]
    fn test_resolve_page_rejects_non_positive_page() {
        assert_eq!(resolve_page(Some(0), Some(10)), (1, 10, 0));
        assert_eq!(resolve_page(Some(-3), Some(10)), (1, 10, 0));
    }

    #[test]
    fn test_page_count_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 31, 1, 15);
        assert_eq!(page.pages, 3);

        let empty: Page<i32> = Page::new(vec![], 0, 1, 15);
        assert_eq!(empty.pages, 0);
    }
}
