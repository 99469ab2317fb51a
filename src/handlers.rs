pub mod auth;
pub mod catalog;
pub mod employees;
pub mod products;
pub mod purchases;
pub mod sales;

use std::str::FromStr;

use serde::Deserialize;

use crate::common::error::AppError;

/// `?include=supplier,lines`. Sem o parâmetro, todas as relações são carregadas;
/// `?include=` vazio não carrega nenhuma.
#[derive(Debug, Default, Deserialize)]
pub struct IncludeQuery {
    pub include: Option<String>,
}

impl IncludeQuery {
    pub fn relations<R>(&self, all: &[R]) -> Result<Vec<R>, AppError>
    where
        R: FromStr<Err = AppError> + Copy,
    {
        match self.include.as_deref() {
            None => Ok(all.to_vec()),
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(R::from_str)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::purchasing::PurchaseRelation;

    fn query(include: Option<&str>) -> IncludeQuery {
        IncludeQuery {
            include: include.map(String::from),
        }
    }

    #[test]
    fn missing_include_loads_everything() {
        let relations = query(None).relations(&PurchaseRelation::ALL).unwrap();
        assert_eq!(relations, PurchaseRelation::ALL.to_vec());
    }

    #[test]
    fn include_lists_are_parsed() {
        let relations = query(Some(" lines ,")).relations(&PurchaseRelation::ALL).unwrap();
        assert_eq!(relations, vec![PurchaseRelation::Lines]);
        assert!(query(Some("")).relations(&PurchaseRelation::ALL).unwrap().is_empty());
        assert!(query(Some("lines,itens")).relations(&PurchaseRelation::ALL).is_err());
    }
}
