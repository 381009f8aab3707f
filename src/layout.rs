use crate::config::LayoutConfig;
use crate::model::Position;

/// Position of the `index`-th table when the document does not give one.
pub fn default_position(index: usize) -> Position {
    LayoutConfig::default().position(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_spread_horizontally() {
        assert_eq!(default_position(0), Position::new(10.0, 10.0));
        assert_eq!(default_position(1), Position::new(310.0, 10.0));
        assert_eq!(default_position(7), Position::new(2110.0, 10.0));
    }
}
