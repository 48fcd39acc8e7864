//! Table formatting for CLI output

use medix_sdk::{Doctor, DoctorStatus};
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct DoctorRow {
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Specialisation")]
    specialisation: String,
    #[tabled(rename = "Hospital")]
    hospital: String,
    #[tabled(rename = "District")]
    district: String,
    #[tabled(rename = "Languages")]
    languages: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

fn status_label(status: DoctorStatus) -> &'static str {
    match status {
        DoctorStatus::Available => "● available",
        DoctorStatus::Busy => "◐ busy",
        DoctorStatus::Unavailable => "○ unavailable",
    }
}

/// Render doctors as a table, in listing order
pub fn doctors_table(doctors: &[Doctor]) -> String {
    let rows = doctors.iter().map(|doctor| DoctorRow {
        status: status_label(doctor.status),
        name: doctor.name.clone(),
        specialisation: doctor.specialisation.clone(),
        hospital: doctor.hospital.clone(),
        district: doctor.district.clone(),
        languages: doctor.languages.clone(),
        phone: doctor.phone.clone(),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(id: &str, name: &str, status: DoctorStatus) -> Doctor {
        Doctor {
            id: id.to_string(),
            name: name.to_string(),
            phone: "+94112000000".to_string(),
            specialisation: "Neurology".to_string(),
            hospital: "National Hospital".to_string(),
            district: "Colombo".to_string(),
            languages: "English".to_string(),
            status,
        }
    }

    #[test]
    fn test_table_keeps_listing_order() {
        let rendered = doctors_table(&[
            doctor("2", "Dr. Wijesinghe", DoctorStatus::Busy),
            doctor("1", "Dr. Fernando", DoctorStatus::Available),
        ]);

        let first = rendered.find("Dr. Wijesinghe").unwrap();
        let second = rendered.find("Dr. Fernando").unwrap();
        assert!(first < second);
        assert!(rendered.contains("◐ busy"));
        assert!(rendered.contains("Specialisation"));
    }
}
