/// Authorization helpers and ownership checks
///
/// This module implements the ownership guard applied uniformly across the
/// quote mutation endpoints.
///
/// # Permission Model
///
/// 1. **Ownership**: a quote may be mutated by the user it belongs to
/// 2. **Administrator bypass**: admins may delete any quote, and may read
///    any user's quote listing
///
/// The bypass does NOT apply to updates: editing a quote is owner-only even
/// for administrators. Handlers decide existence (404) before calling these
/// guards, so a failed guard always means 403, never a disguised 404.
///
/// # Example
///
/// ```
/// use quotewall_shared::auth::authorization::{require_ownership, require_ownership_or_admin};
/// use quotewall_shared::auth::middleware::AuthContext;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let owner_id = Uuid::new_v4();
/// let auth = AuthContext { user_id: owner_id, is_admin: false };
///
/// // Update is owner-only
/// require_ownership(&auth, owner_id)?;
///
/// // Delete allows the admin bypass
/// require_ownership_or_admin(&auth, owner_id)?;
/// # Ok(())
/// # }
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Caller does not own the resource
    #[error("Not authorized to modify this resource")]
    NotOwner,

    /// Caller is neither the owner nor an administrator
    #[error("Not authorized to access this resource")]
    NotAuthorized,
}

/// Checks that the caller owns a resource
///
/// Permits iff the resource's owner id equals the authenticated user id.
/// The administrator flag is deliberately ignored here; quote updates are
/// owner-only.
///
/// # Arguments
///
/// * `auth` - Authentication context
/// * `resource_owner_id` - Owner ID of the resource
///
/// # Errors
///
/// Returns `AuthzError::NotOwner` if the caller is not the owner
pub fn require_ownership(auth: &AuthContext, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id != resource_owner_id {
        return Err(AuthzError::NotOwner);
    }

    Ok(())
}

/// Checks that the caller owns a resource or is an administrator
///
/// Permits iff the resource's owner id equals the authenticated user id, or
/// the caller holds the administrator flag. This is the guard for quote
/// deletion and for reading another user's quote listing.
///
/// # Errors
///
/// Returns `AuthzError::NotAuthorized` if neither condition holds
pub fn require_ownership_or_admin(
    auth: &AuthContext,
    resource_owner_id: Uuid,
) -> Result<(), AuthzError> {
    if auth.user_id != resource_owner_id && !auth.is_admin {
        return Err(AuthzError::NotAuthorized);
    }

    Ok(())
}

/// Checks that the caller is the named user or an administrator
///
/// Used by the per-user quote listing: users may list their own quotes,
/// administrators may list anyone's.
pub fn require_self_or_admin(auth: &AuthContext, user_id: Uuid) -> Result<(), AuthzError> {
    require_ownership_or_admin(auth, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(user_id: Uuid, is_admin: bool) -> AuthContext {
        AuthContext { user_id, is_admin }
    }

    #[test]
    fn test_owner_can_mutate() {
        let owner = Uuid::new_v4();
        assert!(require_ownership(&ctx(owner, false), owner).is_ok());
        assert!(require_ownership_or_admin(&ctx(owner, false), owner).is_ok());
    }

    #[test]
    fn test_non_owner_cannot_mutate() {
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        assert!(matches!(
            require_ownership(&ctx(stranger, false), owner),
            Err(AuthzError::NotOwner)
        ));
        assert!(matches!(
            require_ownership_or_admin(&ctx(stranger, false), owner),
            Err(AuthzError::NotAuthorized)
        ));
    }

    #[test]
    fn test_admin_bypass_applies_to_delete_guard() {
        let owner = Uuid::new_v4();
        let admin = Uuid::new_v4();

        assert!(require_ownership_or_admin(&ctx(admin, true), owner).is_ok());
    }

    #[test]
    fn test_admin_bypass_does_not_apply_to_update_guard() {
        let owner = Uuid::new_v4();
        let admin = Uuid::new_v4();

        // Admins edit only their own quotes
        assert!(matches!(
            require_ownership(&ctx(admin, true), owner),
            Err(AuthzError::NotOwner)
        ));
    }

    #[test]
    fn test_admin_owner_can_update_own_quote() {
        let admin = Uuid::new_v4();
        assert!(require_ownership(&ctx(admin, true), admin).is_ok());
    }

    #[test]
    fn test_self_or_admin_listing() {
        let user = Uuid::new_v4();
        let other = Uuid::new_v4();
        let admin = Uuid::new_v4();

        assert!(require_self_or_admin(&ctx(user, false), user).is_ok());
        assert!(require_self_or_admin(&ctx(admin, true), user).is_ok());
        assert!(matches!(
            require_self_or_admin(&ctx(other, false), user),
            Err(AuthzError::NotAuthorized)
        ));
    }
}
