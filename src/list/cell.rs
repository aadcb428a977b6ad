//! Cell resolution.

use crate::error::ListError;

/// Produces the cell description for an item.
///
/// Implemented for every `Fn(&I) -> Option<C>`.
pub trait CellProvider<I, C> {
    fn cell_for(&self, item: &I) -> Option<C>;
}

impl<I, C, F> CellProvider<I, C> for F
where
    F: Fn(&I) -> Option<C>,
{
    fn cell_for(&self, item: &I) -> Option<C> {
        self(item)
    }
}

/// Asks the delegate first, then the fallback supplied at construction.
pub struct CellResolver<I, C> {
    delegate: Option<Box<dyn CellProvider<I, C>>>,
    fallback: Option<Box<dyn CellProvider<I, C>>>,
}

impl<I: std::fmt::Debug, C> CellResolver<I, C> {
    pub fn new(fallback: Option<Box<dyn CellProvider<I, C>>>) -> Self {
        Self {
            delegate: None,
            fallback,
        }
    }

    pub fn set_delegate(&mut self, delegate: Box<dyn CellProvider<I, C>>) {
        self.delegate = Some(delegate);
    }

    pub fn resolve(&self, index: usize, item: &I) -> Result<C, ListError> {
        self.delegate
            .as_ref()
            .and_then(|provider| provider.cell_for(item))
            .or_else(|| {
                self.fallback
                    .as_ref()
                    .and_then(|provider| provider.cell_for(item))
            })
            .ok_or_else(|| ListError::MissingCellProvider {
                item: format!("{:?}", item),
                index,
            })
    }
}
