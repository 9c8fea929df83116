/*! The systems and subsystems an error report can be tagged with. */

use strum::{Display, EnumIter, IntoEnumIterator, IntoStaticStr};

/** The top level systems of the organization. */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, IntoStaticStr)]
pub enum System {
    Board,
    Electrical,
    Marketing,
    Mechanical,
    Software,
}

impl System {
    /// Get a string representing the name of the system.
    pub fn name(&self) -> &'static str {
        (*self).into()
    }

    /// Find a system by name, ignoring case.
    pub fn from_name(name: &str) -> Option<System> {
        let name = name.trim();
        System::iter().find(|sys| sys.name().eq_ignore_ascii_case(name))
    }

    /// The subsystems that belong to this system.
    pub fn subsystems(&self) -> &'static [&'static str] {
        use System::*;

        match self {
            Board => &[
                "Electrical",
                "Finance",
                "HR",
                "Kiosk",
                "Marketing",
                "Mechanical",
                "Production",
                "Project",
                "Software",
            ],
            Electrical => &[
                "ACU",
                "Accumulator",
                "AMS",
                "Battery",
                "CAD",
                "Casings",
                "Electrical Systems",
                "Embedded Systems",
                "Inverter",
                "Motors",
                "PCU",
                "Powertrain",
                "Sensor Systems",
                "Signal",
                "VCU",
                "Wire Harness",
            ],
            Marketing => &[
                "Advertising",
                "Events",
                "Graphic Design",
                "Photography",
                "Public Relations",
                "Social Media",
                "Sponsorship",
                "Web Development",
            ],
            Mechanical => &[
                "Aerodynamics",
                "Brake System",
                "CAD",
                "Chassis",
                "Cooling System",
                "Composites",
                "Drivetrain",
                "EBS",
                "Ergonomics",
                "Fibersim",
                "Front Wing",
                "Gearbox",
                "IA",
                "Inboard Suspension",
                "Inserts",
                "Motor",
                "Outbound Suspension",
                "Pedal Box",
                "Powertrain",
                "Rear Wing",
                "Rims",
                "Simulation",
                "Steering",
                "Structural",
                "Suspension",
                "Undertray",
                "Uprights",
                "Vehicle Dynamics",
            ],
            Software => &[
                "Autonomous Systems",
                "Control Systems",
                "Data Engineering",
                "Drivers",
                "Embedded Electronics",
                "Golog",
                "HIL",
                "Matlab",
                "Modelling",
                "PostPro",
                "Performance",
                "Simulation",
                "Telemetry",
                "Torque Vectoring",
            ],
        }
    }

    /// Does this system have a subsystem by this name (ignoring case)?
    pub fn has_subsystem(&self, subsystem: &str) -> bool {
        let subsystem = subsystem.trim();
        self.subsystems()
            .iter()
            .any(|s| s.eq_ignore_ascii_case(subsystem))
    }
}
