//! Human-readable descriptor reports.
//!
//! Formats a device tree into the fixed plain-text layout: identification
//! block, class/subclass/protocol codes annotated with registry names
//! where known, per-interface alternate and endpoint blocks, and raw
//! descriptor hex dumps.

use crate::classes::{ClassDataError, ClassRegistry};
use crate::model::{AlternateSetting, DeviceReport, Endpoint, Interface};
use std::io::Write;
use thiserror::Error;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    ClassData(#[from] ClassDataError),
}

/// Writes descriptor reports for USB devices.
///
/// Stateless between devices: output is purely a function of the device
/// tree and the registry.
pub struct DescriptorReporter<'a> {
    registry: &'a ClassRegistry,
    show_raw: bool,
}

impl<'a> DescriptorReporter<'a> {
    /// Create a reporter resolving names against the given registry.
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self {
            registry,
            show_raw: true,
        }
    }

    /// Include or omit the raw descriptor dumps.
    pub fn with_raw_descriptors(mut self, show: bool) -> Self {
        self.show_raw = show;
        self
    }

    /// Write a report for each device, in order.
    pub fn write_devices<W: Write>(
        &self,
        out: &mut W,
        devices: &[DeviceReport],
    ) -> Result<(), ReportError> {
        for device in devices {
            self.write_device(out, device)?;
        }
        Ok(())
    }

    /// Write the report for a single device.
    pub fn write_device<W: Write>(
        &self,
        out: &mut W,
        device: &DeviceReport,
    ) -> Result<(), ReportError> {
        writeln!(out, "Device:")?;
        writeln!(out, "  VID: 0x{:04x}", device.vendor_id)?;
        writeln!(out, "  PID: 0x{:04x}", device.product_id)?;
        if let Some(manufacturer) = &device.manufacturer {
            writeln!(out, "  Manufacturer:  {}", manufacturer)?;
        }
        if let Some(product) = &device.product {
            writeln!(out, "  Product name:  {}", product)?;
        }
        if let Some(serial) = &device.serial {
            writeln!(out, "  Serial number: {}", serial)?;
        }

        let (class, subclass, protocol) =
            (device.class_code, device.subclass_code, device.protocol_code);
        self.code_line(out, "  Device class:    ", class, self.registry.class_name(class)?)?;
        self.code_line(
            out,
            "  Device subclass: ",
            subclass,
            self.registry.subclass_name(class, subclass)?,
        )?;
        self.code_line(
            out,
            "  Device protocol: ",
            protocol,
            self.registry.protocol_name(class, subclass, protocol)?,
        )?;

        for interface in &device.interfaces {
            self.write_interface(out, interface)?;
        }

        if self.show_raw {
            write_raw_descriptor(out, "Device descriptor", &device.device_descriptor)?;
            write_raw_descriptor(out, "Configuration descriptor", &device.config_descriptor)?;
        }

        writeln!(out)?;
        writeln!(out)?;
        Ok(())
    }

    /// Write every alternate of an interface, in declared order.
    fn write_interface<W: Write>(
        &self,
        out: &mut W,
        interface: &Interface,
    ) -> Result<(), ReportError> {
        for alternate in &interface.alternates {
            self.write_alternate(out, interface, alternate)?;
        }
        Ok(())
    }

    fn write_alternate<W: Write>(
        &self,
        out: &mut W,
        interface: &Interface,
        alternate: &AlternateSetting,
    ) -> Result<(), ReportError> {
        writeln!(out)?;
        if interface.is_active(alternate) {
            writeln!(out, "  Interface {}", interface.number)?;
        } else {
            writeln!(
                out,
                "  Interface {} (alternate {})",
                interface.number, alternate.number
            )?;
        }

        let (class, subclass, protocol) = (
            alternate.class_code,
            alternate.subclass_code,
            alternate.protocol_code,
        );
        self.code_line(
            out,
            "    Interface class:    ",
            class,
            self.registry.class_name(class)?,
        )?;
        self.code_line(
            out,
            "    Interface subclass: ",
            subclass,
            self.registry.subclass_name(class, subclass)?,
        )?;
        self.code_line(
            out,
            "    Interface protocol: ",
            protocol,
            self.registry.protocol_name(class, subclass, protocol)?,
        )?;

        for endpoint in &alternate.endpoints {
            write_endpoint(out, endpoint)?;
        }
        Ok(())
    }

    /// Write a code line, annotated with the resolved name if known.
    fn code_line<W: Write>(
        &self,
        out: &mut W,
        label: &str,
        code: u8,
        name: Option<&str>,
    ) -> Result<(), ReportError> {
        match name {
            Some(name) => writeln!(out, "{}0x{:02x} ({})", label, code, name)?,
            None => writeln!(out, "{}0x{:02x}", label, code)?,
        }
        Ok(())
    }
}

fn write_endpoint<W: Write>(out: &mut W, endpoint: &Endpoint) -> Result<(), ReportError> {
    writeln!(out)?;
    writeln!(out, "    Endpoint {}", endpoint.number)?;
    writeln!(out, "        Direction: {}", endpoint.direction)?;
    writeln!(out, "        Transfer type: {}", endpoint.transfer_type)?;
    writeln!(out, "        Packet size: {} bytes", endpoint.max_packet_size)?;
    Ok(())
}

/// Write a raw descriptor dump: 16 bytes per line, each line prefixed
/// with the zero-padded hex offset of its first byte.
fn write_raw_descriptor<W: Write>(
    out: &mut W,
    title: &str,
    data: &[u8],
) -> Result<(), ReportError> {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    for (index, chunk) in data.chunks(16).enumerate() {
        write!(out, "{:04x} ", index * 16)?;
        for byte in chunk {
            write!(out, " {:02x}", byte)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, TransferType};

    fn hid_mouse() -> DeviceReport {
        DeviceReport {
            vendor_id: 0x1234,
            product_id: 0x5678,
            class_code: 0x03,
            subclass_code: 0x01,
            protocol_code: 0x02,
            interfaces: vec![Interface {
                number: 0,
                active_alternate: 0,
                alternates: vec![AlternateSetting {
                    number: 0,
                    class_code: 0x03,
                    subclass_code: 0x01,
                    protocol_code: 0x02,
                    endpoints: vec![Endpoint {
                        number: 1,
                        direction: Direction::In,
                        transfer_type: TransferType::Interrupt,
                        max_packet_size: 8,
                    }],
                }],
            }],
            ..Default::default()
        }
    }

    fn render(device: &DeviceReport) -> String {
        let registry = ClassRegistry::new();
        let reporter = DescriptorReporter::new(&registry);
        let mut out = Vec::new();
        reporter.write_device(&mut out, device).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_identification_block() {
        let report = render(&hid_mouse());
        assert!(report.contains("  VID: 0x1234\n"));
        assert!(report.contains("  PID: 0x5678\n"));
        // Absent strings are omitted entirely, not printed as placeholders.
        assert!(!report.contains("Manufacturer"));
        assert!(!report.contains("Product name"));
        assert!(!report.contains("Serial number"));
    }

    #[test]
    fn test_present_strings_are_printed() {
        let mut device = hid_mouse();
        device.manufacturer = Some("ACME".to_string());
        device.serial = Some("0001".to_string());
        let report = render(&device);
        assert!(report.contains("  Manufacturer:  ACME\n"));
        assert!(report.contains("  Serial number: 0001\n"));
    }

    #[test]
    fn test_code_lines_annotated_with_known_names() {
        let report = render(&hid_mouse());
        assert!(report.contains("  Device class:    0x03 (Human Interface Device)\n"));
        assert!(report.contains("  Device subclass: 0x01 (Boot Interface Subclass)\n"));
        assert!(report.contains("  Device protocol: 0x02 (Mouse)\n"));
    }

    #[test]
    fn test_unknown_codes_left_unannotated() {
        let mut device = hid_mouse();
        device.class_code = 0x99;
        let report = render(&device);
        assert!(report.contains("  Device class:    0x99\n"));
        // No parenthesized suffix for the unknown class or its children.
        assert!(report.contains("  Device subclass: 0x01\n"));
        assert!(report.contains("  Device protocol: 0x02\n"));
    }

    #[test]
    fn test_interface_block_uses_subclass_table() {
        // Printer class: 0x07/0x01/0x02 has distinct names in the
        // subclass and protocol tables, so a protocol-table mixup on the
        // subclass line would be visible here.
        let mut device = hid_mouse();
        device.interfaces[0].alternates[0].class_code = 0x07;
        device.interfaces[0].alternates[0].subclass_code = 0x01;
        device.interfaces[0].alternates[0].protocol_code = 0x02;
        let report = render(&device);
        assert!(report.contains("    Interface class:    0x07 (Printer)\n"));
        assert!(report.contains("    Interface subclass: 0x01 (Printer)\n"));
        assert!(report.contains("    Interface protocol: 0x02 (Bidirectional)\n"));
    }

    #[test]
    fn test_endpoint_block() {
        let report = render(&hid_mouse());
        assert!(report.contains("    Endpoint 1\n"));
        assert!(report.contains("        Direction: IN\n"));
        assert!(report.contains("        Transfer type: Interrupt\n"));
        assert!(report.contains("        Packet size: 8 bytes\n"));
    }

    #[test]
    fn test_alternate_headers() {
        let mut device = hid_mouse();
        let mut second = device.interfaces[0].alternates[0].clone();
        second.number = 1;
        device.interfaces[0].alternates.push(second);
        let report = render(&device);
        assert!(report.contains("  Interface 0\n"));
        assert!(report.contains("  Interface 0 (alternate 1)\n"));
    }

    #[test]
    fn test_raw_descriptor_dump_lines() {
        let mut out = Vec::new();
        let data: Vec<u8> = (0u8..20).collect();
        write_raw_descriptor(&mut out, "Device descriptor", &data).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "Device descriptor");
        assert_eq!(
            lines[2],
            "0000  00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f"
        );
        assert_eq!(lines[3], "0010  10 11 12 13");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_raw_dumps_can_be_disabled() {
        let registry = ClassRegistry::new();
        let reporter = DescriptorReporter::new(&registry).with_raw_descriptors(false);
        let mut device = hid_mouse();
        device.device_descriptor = vec![0x12, 0x01];
        let mut out = Vec::new();
        reporter.write_device(&mut out, &device).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert!(!report.contains("Device descriptor"));
        assert!(!report.contains("Configuration descriptor"));
    }

    #[test]
    fn test_devices_written_in_order() {
        let registry = ClassRegistry::new();
        let reporter = DescriptorReporter::new(&registry);
        let mut second = hid_mouse();
        second.vendor_id = 0xabcd;
        let mut out = Vec::new();
        reporter
            .write_devices(&mut out, &[hid_mouse(), second])
            .unwrap();
        let report = String::from_utf8(out).unwrap();
        let first_pos = report.find("VID: 0x1234").unwrap();
        let second_pos = report.find("VID: 0xabcd").unwrap();
        assert!(first_pos < second_pos);
    }
}
