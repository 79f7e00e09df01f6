//! Closed route catalogue.
//!
//! Every HTTP endpoint the service exposes has a variant here, and the
//! role table below is the single place authorization requirements live.
//! The auth middleware resolves the incoming request against this catalogue
//! once, at dispatch.

use axum::http::Method;

use coffeedocket_auth::Role;

/// Minimum privilege needed to hit a route.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RequiredRole {
    /// No token needed.
    Public,
    Staff,
    Admin,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Route {
    Health,
    Whoami,

    SignUp,
    SignIn,
    SignOut,
    ResetPassword,
    UpdateAccount,

    ListCustomers,
    CreateCustomer,
    GetCustomer,
    UpdateCustomer,
    DeleteCustomer,

    ListCustomerTransactions,
    CreateTransaction,
    ListTransactions,

    ListMenuItems,
    CreateMenuItem,
    UpdateMenuItem,
    DeleteMenuItem,
    ListMenuSizes,
    CreateMenuSize,
    UpdateMenuSize,
    DeleteMenuSize,
    ListMenuAddons,
    CreateMenuAddon,
    UpdateMenuAddon,
    DeleteMenuAddon,
    QuotePrice,

    ListAdminUsers,
    UpdateAdminUser,
    DeleteAdminUser,
}

impl Route {
    /// The role table. Reads and day-to-day actions are staff level;
    /// destructive and identity-administration actions are admin only.
    pub fn required_role(self) -> RequiredRole {
        use Route::*;
        match self {
            Health | SignUp | SignIn | ResetPassword => RequiredRole::Public,

            Whoami | SignOut | UpdateAccount => RequiredRole::Staff,

            ListCustomers | CreateCustomer | GetCustomer | UpdateCustomer => RequiredRole::Staff,
            DeleteCustomer => RequiredRole::Admin,

            ListCustomerTransactions | CreateTransaction => RequiredRole::Staff,
            ListTransactions => RequiredRole::Admin,

            ListMenuItems | ListMenuSizes | ListMenuAddons | QuotePrice => RequiredRole::Staff,
            CreateMenuItem | UpdateMenuItem | DeleteMenuItem | CreateMenuSize | UpdateMenuSize
            | DeleteMenuSize | CreateMenuAddon | UpdateMenuAddon | DeleteMenuAddon => {
                RequiredRole::Admin
            }

            ListAdminUsers | UpdateAdminUser | DeleteAdminUser => RequiredRole::Admin,
        }
    }

    /// Whether `role` satisfies this route's requirement.
    pub fn allowed_for(self, role: Role) -> bool {
        match self.required_role() {
            RequiredRole::Public => true,
            RequiredRole::Staff => role.allows(Role::Staff),
            RequiredRole::Admin => role.allows(Role::Admin),
        }
    }

    /// Resolve a method + path to a route. `None` means the router will 404.
    pub fn resolve(method: &Method, path: &str) -> Option<Route> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        use Route::*;
        let route = match (method.as_str(), segments.as_slice()) {
            ("GET", ["healthz"]) => Health,
            ("GET", ["whoami"]) => Whoami,

            ("POST", ["auth", "signup"]) => SignUp,
            ("POST", ["auth", "signin"]) => SignIn,
            ("POST", ["auth", "signout"]) => SignOut,
            ("POST", ["auth", "reset-password"]) => ResetPassword,
            ("PATCH", ["auth", "user"]) => UpdateAccount,

            ("GET", ["customers"]) => ListCustomers,
            ("POST", ["customers"]) => CreateCustomer,
            ("GET", ["customers", _]) => GetCustomer,
            ("PATCH", ["customers", _]) => UpdateCustomer,
            ("DELETE", ["customers", _]) => DeleteCustomer,

            ("GET", ["customers", _, "transactions"]) => ListCustomerTransactions,
            ("POST", ["customers", _, "transactions"]) => CreateTransaction,
            ("GET", ["transactions"]) => ListTransactions,

            ("GET", ["menu", "items"]) => ListMenuItems,
            ("POST", ["menu", "items"]) => CreateMenuItem,
            ("PATCH", ["menu", "items", _]) => UpdateMenuItem,
            ("DELETE", ["menu", "items", _]) => DeleteMenuItem,
            ("GET", ["menu", "sizes"]) => ListMenuSizes,
            ("POST", ["menu", "sizes"]) => CreateMenuSize,
            ("PATCH", ["menu", "sizes", _]) => UpdateMenuSize,
            ("DELETE", ["menu", "sizes", _]) => DeleteMenuSize,
            ("GET", ["menu", "addons"]) => ListMenuAddons,
            ("POST", ["menu", "addons"]) => CreateMenuAddon,
            ("PATCH", ["menu", "addons", _]) => UpdateMenuAddon,
            ("DELETE", ["menu", "addons", _]) => DeleteMenuAddon,
            ("POST", ["menu", "quote"]) => QuotePrice,

            ("GET", ["admin", "users"]) => ListAdminUsers,
            ("PATCH", ["admin", "users", _]) => UpdateAdminUser,
            ("DELETE", ["admin", "users", _]) => DeleteAdminUser,

            _ => return None,
        };
        Some(route)
    }
}
