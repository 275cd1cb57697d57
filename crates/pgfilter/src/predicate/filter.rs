/// Optional filters for the accounts table.
///
/// Empty sequences and `None` mean "no constraint". `active: Some(false)` is a
/// real constraint.
///
/// ```ignore
/// let filter = AccountFilter::new()
///     .names(["Jane", "John"])
///     .active(true)
///     .fav_colors(["red", "blue", "green"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub names: Vec<String>,
    pub active: Option<bool>,
    pub fav_colors: Vec<String>,
}

impl AccountFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn fav_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fav_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    /// True when no field constrains the query.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.active.is_none() && self.fav_colors.is_empty()
    }
}
