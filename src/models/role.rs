//! Roles y permisos
//!
//! Tabla única de permisos por rol y módulo. La API la consulta en cada
//! operación protegida y `GET /api/auth/permissions` la expone tal cual
//! para que la interfaz aplique exactamente las mismas reglas.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::text_enum;

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    SuperAdmin,
    Admin,
    Operador,
    Cliente,
}

text_enum!(Role, "role", {
    SuperAdmin => "SUPER_ADMIN",
    Admin => "ADMIN",
    Operador => "OPERADOR",
    Cliente => "CLIENTE",
});

/// Áreas de la aplicación controladas por rol
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    Dashboard,
    Usuarios,
    Vehiculos,
    Clientes,
    Reservas,
    Facturacion,
    Mantenimiento,
    Perfil,
}

text_enum!(Module, "module", {
    Dashboard => "dashboard",
    Usuarios => "usuarios",
    Vehiculos => "vehiculos",
    Clientes => "clientes",
    Reservas => "reservas",
    Facturacion => "facturacion",
    Mantenimiento => "mantenimiento",
    Perfil => "perfil",
});

/// Acciones que se pueden permitir sobre un módulo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
    Approve,
}

text_enum!(Action, "action", {
    View => "view",
    Create => "create",
    Edit => "edit",
    Delete => "delete",
    Approve => "approve",
});

/// Banderas CRUD de un rol sobre un módulo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePermissions {
    pub view: bool,
    pub create: bool,
    pub edit: bool,
    pub delete: bool,
    pub approve: bool,
}

impl ModulePermissions {
    pub const NONE: Self = Self::flags(false, false, false, false, false);
    pub const ALL: Self = Self::flags(true, true, true, true, true);
    pub const VIEW: Self = Self::flags(true, false, false, false, false);
    pub const VIEW_EDIT: Self = Self::flags(true, false, true, false, false);
    pub const VIEW_CREATE: Self = Self::flags(true, true, false, false, false);
    pub const VIEW_CREATE_EDIT: Self = Self::flags(true, true, true, false, false);

    const fn flags(view: bool, create: bool, edit: bool, delete: bool, approve: bool) -> Self {
        Self { view, create, edit, delete, approve }
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::View => self.view,
            Action::Create => self.create,
            Action::Edit => self.edit,
            Action::Delete => self.delete,
            Action::Approve => self.approve,
        }
    }
}

impl Role {
    /// Permisos del rol sobre un módulo
    pub const fn permissions(self, module: Module) -> ModulePermissions {
        use Module::*;
        use ModulePermissions as P;

        match (self, module) {
            (_, Perfil) => P::VIEW_EDIT,

            (Role::SuperAdmin, _) | (Role::Admin, _) => P::ALL,

            (Role::Operador, Dashboard) => P::VIEW,
            (Role::Operador, Usuarios) => P::NONE,
            (Role::Operador, Vehiculos) => P::VIEW_EDIT,
            (Role::Operador, Clientes) => P::VIEW_CREATE_EDIT,
            (Role::Operador, Reservas) => P::VIEW_CREATE_EDIT,
            (Role::Operador, Facturacion) => P::VIEW_CREATE,
            (Role::Operador, Mantenimiento) => P::VIEW_CREATE_EDIT,

            (Role::Cliente, Vehiculos) => P::VIEW,
            (Role::Cliente, Reservas) => P::VIEW_CREATE,
            (Role::Cliente, Facturacion) => P::VIEW,
            (Role::Cliente, _) => P::NONE,
        }
    }

    pub fn can(self, module: Module, action: Action) -> bool {
        self.permissions(module).allows(action)
    }

    /// Matriz completa del rol, indexada por módulo
    pub fn permission_matrix(self) -> BTreeMap<Module, ModulePermissions> {
        Module::ALL
            .iter()
            .map(|module| (*module, self.permissions(*module)))
            .collect()
    }

    /// Personal interno (todo excepto clientes del portal)
    pub fn is_staff(self) -> bool {
        !matches!(self, Role::Cliente)
    }

    /// Si `self` puede administrar cuentas con el rol `target`
    pub fn can_manage_user(self, target: Role) -> bool {
        match self {
            Role::SuperAdmin => true,
            Role::Admin => matches!(target, Role::Operador | Role::Cliente),
            Role::Operador | Role::Cliente => false,
        }
    }

    /// Si `self` puede crear cuentas con el rol `role`
    pub fn can_create_role(self, role: Role) -> bool {
        self.can_manage_user(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"SUPER_ADMIN\"");
        assert_eq!(serde_json::from_str::<Role>("\"OPERADOR\"").unwrap(), Role::Operador);
        assert_eq!("CLIENTE".parse::<Role>().unwrap(), Role::Cliente);
        assert!("cliente".parse::<Role>().is_err());
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
    }

    #[test]
    fn test_admins_have_every_permission_except_profile_management() {
        for role in [Role::SuperAdmin, Role::Admin] {
            for module in Module::ALL.iter().filter(|m| **m != Module::Perfil) {
                assert_eq!(role.permissions(*module), ModulePermissions::ALL, "{role} {module}");
            }
            assert!(!role.can(Module::Perfil, Action::Delete));
        }
    }

    #[test]
    fn test_operador_permissions() {
        let role = Role::Operador;
        assert!(role.can(Module::Dashboard, Action::View));
        assert!(!role.can(Module::Usuarios, Action::View));
        assert!(role.can(Module::Vehiculos, Action::Edit));
        assert!(!role.can(Module::Vehiculos, Action::Create));
        assert!(role.can(Module::Clientes, Action::Create));
        assert!(!role.can(Module::Clientes, Action::Approve));
        assert!(role.can(Module::Reservas, Action::Create));
        assert!(!role.can(Module::Reservas, Action::Approve));
        assert!(!role.can(Module::Reservas, Action::Delete));
        assert!(role.can(Module::Facturacion, Action::Create));
        assert!(!role.can(Module::Facturacion, Action::Edit));
        assert!(role.can(Module::Mantenimiento, Action::Edit));
    }

    #[test]
    fn test_cliente_permissions() {
        let role = Role::Cliente;
        assert!(!role.can(Module::Dashboard, Action::View));
        assert!(!role.can(Module::Clientes, Action::View));
        assert!(role.can(Module::Vehiculos, Action::View));
        assert!(!role.can(Module::Vehiculos, Action::Edit));
        assert!(role.can(Module::Reservas, Action::Create));
        assert!(!role.can(Module::Reservas, Action::Edit));
        assert!(role.can(Module::Facturacion, Action::View));
        assert!(role.can(Module::Perfil, Action::Edit));
        assert!(!role.is_staff());
    }

    #[test]
    fn test_can_manage_user() {
        for target in Role::ALL {
            assert!(Role::SuperAdmin.can_manage_user(*target));
            assert!(!Role::Operador.can_manage_user(*target));
            assert!(!Role::Cliente.can_manage_user(*target));
        }
        assert!(!Role::Admin.can_manage_user(Role::SuperAdmin));
        assert!(!Role::Admin.can_manage_user(Role::Admin));
        assert!(Role::Admin.can_manage_user(Role::Operador));
        assert!(Role::Admin.can_create_role(Role::Cliente));
        assert!(!Role::Admin.can_create_role(Role::Admin));
    }

    #[test]
    fn test_permission_matrix_covers_every_module() {
        let matrix = Role::Operador.permission_matrix();
        assert_eq!(matrix.len(), Module::ALL.len());
        assert_eq!(matrix[&Module::Usuarios], ModulePermissions::NONE);

        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(json["clientes"]["create"], true);
        assert_eq!(json["clientes"]["approve"], false);
    }
}
