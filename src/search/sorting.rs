use crate::params::ParameterBag;
use serde::{Deserialize, Serialize};

/// Column the search endpoint can sort by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Distance,
    Favorites,
    Size,
    Difficulty,
    Terrain,
    LastFound,
    PlacedOn,
}

impl Column {
    /// Name the search endpoint expects in `sort`
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::Distance => "Distance",
            Column::Favorites => "FavoritePoint",
            Column::Size => "ContainerSize",
            Column::Difficulty => "Difficulty",
            Column::Terrain => "Terrain",
            Column::LastFound => "DateLastVisited",
            Column::PlacedOn => "PlaceDate",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    /// Value of the `asc` flag
    pub fn as_str(&self) -> &'static str {
        match self {
            Order::Ascending => "True",
            Order::Descending => "False",
        }
    }
}

/// Sort column and direction of a search
///
/// The order is only encoded when a column is set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sorting {
    column: Option<Column>,
    order: Order,
    parameters: ParameterBag,
}

impl Sorting {
    pub fn new(column: Option<Column>, order: Order) -> Self {
        let mut parameters = ParameterBag::new();
        if let Some(column) = column {
            parameters.set("sort", column.as_str().to_string());
            parameters.set("asc", order.as_str().to_string());
        }
        Self {
            column,
            order,
            parameters,
        }
    }

    pub fn by(column: Column, order: Order) -> Self {
        Self::new(Some(column), order)
    }

    pub fn column(&self) -> Option<Column> {
        self.column
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn parameters(&self) -> &ParameterBag {
        &self.parameters
    }
}
