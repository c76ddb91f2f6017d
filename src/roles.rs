/// Closed role set. Whatever else the store hands back lands on `Unknown`,
/// which is allowed to do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Staff,
    Client,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ManageUsers,
    ManageRooms,
    ViewReports,
    GenerateQrSheet,
    CheckIn,
    ViewHistory,
    SubmitReport,
}

impl Role {
    pub fn parse(s: &str) -> Role {
        match s {
            "admin" => Role::Admin,
            "staff" => Role::Staff,
            "client" => Role::Client,
            _ => Role::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Staff => "staff",
            Role::Client => "client",
            Role::Unknown => "",
        }
    }

    pub fn actions(self) -> &'static [Action] {
        use Action::*;
        match self {
            Role::Admin => &[ManageUsers, ManageRooms, ViewReports, GenerateQrSheet],
            Role::Staff => &[CheckIn],
            Role::Client => &[ViewHistory, SubmitReport],
            Role::Unknown => &[],
        }
    }

    pub fn allows(self, action: Action) -> bool {
        self.actions().contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_closed() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("staff"), Role::Staff);
        assert_eq!(Role::parse("client"), Role::Client);
        assert_eq!(Role::parse(""), Role::Unknown);
        assert_eq!(Role::parse("superuser"), Role::Unknown);
        assert_eq!(Role::parse("Admin"), Role::Unknown);
    }

    #[test]
    fn unknown_may_do_nothing() {
        assert!(Role::Unknown.actions().is_empty());
        assert!(!Role::Unknown.allows(Action::CheckIn));
        assert!(!Role::Unknown.allows(Action::ManageUsers));
    }

    #[test]
    fn action_table() {
        assert!(Role::Admin.allows(Action::GenerateQrSheet));
        assert!(!Role::Admin.allows(Action::CheckIn));
        assert!(Role::Staff.allows(Action::CheckIn));
        assert!(!Role::Staff.allows(Action::ViewReports));
        assert!(Role::Client.allows(Action::SubmitReport));
        assert!(!Role::Client.allows(Action::ManageRooms));
    }
}
