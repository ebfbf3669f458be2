use std::collections::HashSet;

use axum::http::Method;

use crate::types::Role;

/// What a guarded endpoint accepts.
///
/// `allowed_methods == None` accepts every method; an empty `required_roles`
/// accepts any authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    pub allowed_methods: Option<HashSet<Method>>,
    pub required_roles: HashSet<Role>,
    pub require_json: bool,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            allowed_methods: Some(HashSet::from([Method::POST])),
            required_roles: HashSet::new(),
            require_json: false,
        }
    }
}

impl GatePolicy {
    /// Any method, any authenticated role.
    pub fn login_required() -> Self {
        Self {
            allowed_methods: None,
            ..Self::default()
        }
    }

    /// Any method, one of `roles`.
    pub fn role_required(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::login_required().with_roles(roles)
    }

    /// Method allow-list plus optional role restriction; POST only when
    /// `methods` is empty.
    pub fn secure_ajax(
        methods: impl IntoIterator<Item = Method>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        let methods: HashSet<Method> = methods.into_iter().collect();
        let policy = if methods.is_empty() {
            Self::default()
        } else {
            Self {
                allowed_methods: Some(methods),
                ..Self::default()
            }
        };
        policy.with_roles(roles)
    }

    /// POST-only endpoint whose JSON body is parsed by the gate.
    pub fn validate_json() -> Self {
        Self::default().with_json()
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.allowed_methods = Some(methods.into_iter().collect());
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.required_roles = roles.into_iter().collect();
        self
    }

    pub fn with_json(mut self) -> Self {
        self.require_json = true;
        self
    }

    pub fn allows_method(&self, method: &Method) -> bool {
        self.allowed_methods
            .as_ref()
            .map_or(true, |methods| methods.contains(method))
    }

    pub fn allows_role(&self, role: Option<Role>) -> bool {
        if self.required_roles.is_empty() {
            return true;
        }
        role.map_or(false, |role| self.required_roles.contains(&role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_post_only_any_role() {
        let policy = GatePolicy::default();
        assert!(policy.allows_method(&Method::POST));
        assert!(!policy.allows_method(&Method::GET));
        assert!(policy.allows_role(Some(Role::Student)));
        assert!(!policy.require_json);
    }

    #[test]
    fn login_required_accepts_every_method() {
        let policy = GatePolicy::login_required();
        assert!(policy.allows_method(&Method::DELETE));
        assert!(policy.allows_method(&Method::GET));
    }

    #[test]
    fn secure_ajax_defaults_to_post() {
        let policy = GatePolicy::secure_ajax(Vec::<Method>::new(), [Role::Admin]);
        assert!(policy.allows_method(&Method::POST));
        assert!(!policy.allows_method(&Method::PUT));
        assert!(!policy.allows_role(Some(Role::Staff)));
        assert!(policy.allows_role(Some(Role::Admin)));
    }

    #[test]
    fn role_restriction_rejects_missing_role() {
        let policy = GatePolicy::role_required([Role::Admin, Role::Staff]);
        assert!(!policy.allows_role(None));
        assert!(policy.allows_role(Some(Role::Staff)));
    }
}
