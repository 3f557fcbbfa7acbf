/// Filter set accepted by the admin listing endpoints.
///
/// Unset filters are omitted from the query string; `roles` is comma-joined
/// the way the backend's filter parser splits it.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    page: Option<u32>,
    size: Option<u32>,
    search: Option<String>,
    sort: Option<String>,
    roles: Vec<String>,
    is_active: Option<bool>,
    is_email_verified: Option<bool>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Sort field; prefix with `-` for descending, e.g. `-created_at`.
    pub fn sort(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(field.into());
        self
    }

    /// Accumulates; repeated calls filter by any of the given role names.
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn is_active(mut self, value: bool) -> Self {
        self.is_active = Some(value);
        self
    }

    pub fn is_email_verified(mut self, value: bool) -> Self {
        self.is_email_verified = Some(value);
        self
    }

    pub(crate) fn into_pairs(self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size".to_string(), size.to_string()));
        }
        if let Some(search) = self.search {
            pairs.push(("search".to_string(), search));
        }
        if let Some(sort) = self.sort {
            pairs.push(("sort".to_string(), sort));
        }
        if !self.roles.is_empty() {
            pairs.push(("roles".to_string(), self.roles.join(",")));
        }
        if let Some(is_active) = self.is_active {
            pairs.push(("is_active".to_string(), is_active.to_string()));
        }
        if let Some(is_email_verified) = self.is_email_verified {
            pairs.push(("is_email_verified".to_string(), is_email_verified.to_string()));
        }
        pairs
    }
}
