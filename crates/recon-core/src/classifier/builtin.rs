// Built-in calling codes and region tables.
//
// Region detail exists for Brazil (2-digit area code), India (3-digit
// mobile prefix) and Angola (2-digit prefix). Owner names are fictitious
// placeholders.

use super::{CountryEntry, NumberOriginTable, OwnerType, RegionDefaults, RegionTable};

const COUNTRIES: &[(&str, &str, &str)] = &[
    ("1", "United States/Canada", "America/New_York"),
    ("7", "Russia", "Europe/Moscow"),
    ("20", "Egypt", "Africa/Cairo"),
    ("27", "South Africa", "Africa/Johannesburg"),
    ("31", "Netherlands", "Europe/Amsterdam"),
    ("32", "Belgium", "Europe/Brussels"),
    ("33", "France", "Europe/Paris"),
    ("34", "Spain", "Europe/Madrid"),
    ("36", "Hungary", "Europe/Budapest"),
    ("39", "Italy", "Europe/Rome"),
    ("41", "Switzerland", "Europe/Zurich"),
    ("43", "Austria", "Europe/Vienna"),
    ("44", "United Kingdom", "Europe/London"),
    ("45", "Denmark", "Europe/Copenhagen"),
    ("46", "Sweden", "Europe/Stockholm"),
    ("47", "Norway", "Europe/Oslo"),
    ("48", "Poland", "Europe/Warsaw"),
    ("49", "Germany", "Europe/Berlin"),
    ("51", "Peru", "America/Lima"),
    ("54", "Argentina", "America/Argentina/Buenos_Aires"),
    ("55", "Brazil", "America/Sao_Paulo"),
    ("56", "Chile", "America/Santiago"),
    ("57", "Colombia", "America/Bogota"),
    ("58", "Venezuela", "America/Caracas"),
    ("60", "Malaysia", "Asia/Kuala_Lumpur"),
    ("61", "Australia", "Australia/Sydney"),
    ("62", "Indonesia", "Asia/Jakarta"),
    ("63", "Philippines", "Asia/Manila"),
    ("64", "New Zealand", "Pacific/Auckland"),
    ("65", "Singapore", "Asia/Singapore"),
    ("66", "Thailand", "Asia/Bangkok"),
    ("81", "Japan", "Asia/Tokyo"),
    ("82", "South Korea", "Asia/Seoul"),
    ("84", "Vietnam", "Asia/Ho_Chi_Minh"),
    ("86", "China", "Asia/Shanghai"),
    ("90", "Turkey", "Europe/Istanbul"),
    ("91", "India", "Asia/Kolkata"),
    ("234", "Nigeria", "Africa/Lagos"),
    ("244", "Angola", "Africa/Luanda"),
    ("254", "Kenya", "Africa/Nairobi"),
    ("358", "Finland", "Europe/Helsinki"),
    ("370", "Lithuania", "Europe/Vilnius"),
    ("371", "Latvia", "Europe/Riga"),
    ("372", "Estonia", "Europe/Tallinn"),
    ("375", "Belarus", "Europe/Minsk"),
    ("380", "Ukraine", "Europe/Kiev"),
    ("420", "Czech Republic", "Europe/Prague"),
    ("591", "Bolivia", "America/La_Paz"),
    ("593", "Ecuador", "America/Guayaquil"),
    ("595", "Paraguay", "America/Asuncion"),
    ("598", "Uruguay", "America/Montevideo"),
    ("966", "Saudi Arabia", "Asia/Riyadh"),
    ("971", "United Arab Emirates", "Asia/Dubai"),
    ("972", "Israel", "Asia/Jerusalem"),
];

// (area code, carrier, city, owner)
const BRAZIL: &[(&str, &str, &str, &str)] = &[
    ("11", "Vivo", "São Paulo", "João Silva"),
    ("21", "Claro", "Rio de Janeiro", "Maria Santos"),
    ("31", "TIM", "Belo Horizonte", "Pedro Oliveira"),
    ("41", "Oi", "Curitiba", "Ana Costa"),
    ("51", "Vivo", "Porto Alegre", "Carlos Ferreira"),
    ("61", "Claro", "Brasília", "Lucia Rodrigues"),
    ("71", "TIM", "Salvador", "Roberto Almeida"),
    ("81", "Oi", "Recife", "Fernanda Lima"),
    ("91", "Vivo", "Belém", "Marcos Pereira"),
];

// Every prefix from 720 to 999 is routed to Airtel.
const INDIA_AIRTEL_PREFIXES: std::ops::RangeInclusive<u16> = 720..=999;

// (first prefix, state, cities); city i maps to prefix first + i
#[rustfmt::skip]
const INDIA_LOCATIONS: &[(u16, &str, &[&str])] = &[
    (720, "Delhi NCR", &["New Delhi", "Gurgaon", "Noida", "Faridabad", "Ghaziabad", "Greater Noida"]),
    (730, "Maharashtra", &["Mumbai", "Pune", "Nagpur", "Thane", "Nashik", "Aurangabad"]),
    (740, "Karnataka", &["Bangalore", "Mysore", "Hubli", "Mangalore", "Belgaum", "Gulbarga"]),
    (750, "Gujarat", &["Ahmedabad", "Surat", "Vadodara", "Rajkot", "Bhavnagar", "Jamnagar"]),
    (760, "Andhra Pradesh", &["Visakhapatnam", "Vijayawada", "Guntur", "Nellore", "Kurnool", "Anantapur"]),
    (770, "Tamil Nadu", &["Chennai", "Coimbatore", "Madurai", "Salem", "Vellore", "Trichy"]),
    (780, "West Bengal", &["Kolkata", "Howrah", "Durgapur", "Asansol", "Siliguri", "Kharagpur"]),
    (790, "Uttar Pradesh", &["Lucknow", "Kanpur", "Varanasi", "Agra", "Allahabad", "Meerut"]),
    (800, "Madhya Pradesh", &["Bhopal", "Indore", "Jabalpur", "Gwalior", "Ujjain", "Sagar"]),
    (810, "Bihar", &["Patna", "Gaya", "Bhagalpur", "Muzaffarpur", "Darbhanga", "Arrah"]),
    (820, "Kerala", &["Kochi", "Thiruvananthapuram", "Kozhikode", "Thrissur", "Kollam", "Alappuzha"]),
    (830, "Punjab", &["Chandigarh", "Ludhiana", "Amritsar", "Jalandhar", "Patiala", "Bathinda"]),
    (840, "Odisha", &["Bhubaneswar", "Cuttack", "Rourkela", "Berhampur", "Sambalpur", "Puri"]),
    (850, "Assam", &["Guwahati", "Dibrugarh", "Silchar", "Jorhat", "Tezpur", "Tinsukia"]),
    (860, "Jharkhand", &["Ranchi", "Jamshedpur", "Dhanbad", "Bokaro", "Hazaribagh", "Giridih"]),
    (870, "Chhattisgarh", &["Raipur", "Bhilai", "Bilaspur", "Korba", "Jagdalpur", "Ambikapur"]),
    (880, "Haryana", &["Gurgaon", "Faridabad", "Panipat", "Hisar", "Rohtak", "Karnal"]),
    (890, "Himachal Pradesh", &["Shimla", "Manali", "Dharamshala", "Kullu", "Solan", "Mandi"]),
    (900, "Rajasthan", &["Jaipur", "Jodhpur", "Udaipur", "Kota", "Ajmer", "Bikaner"]),
    (910, "Uttarakhand", &["Dehradun", "Haridwar", "Rishikesh", "Nainital", "Mussoorie", "Almora"]),
    (920, "Jammu & Kashmir", &["Srinagar", "Jammu", "Leh", "Gulmarg", "Pahalgam", "Sonamarg"]),
    (930, "Goa", &["Panaji", "Margao", "Mapusa", "Vasco da Gama", "Ponda", "Calangute"]),
    (940, "Manipur", &["Imphal", "Thoubal", "Bishnupur"]),
    (950, "Meghalaya", &["Shillong", "Tura", "Jowai"]),
    (960, "Arunachal Pradesh", &["Itanagar", "Naharlagun", "Pasighat"]),
    (970, "Mizoram", &["Aizawl", "Lunglei", "Champhai"]),
    (980, "Nagaland", &["Kohima", "Dimapur", "Mokokchung"]),
    (990, "Sikkim", &["Gangtok", "Namchi", "Mangan"]),
];

// (first prefix, owners); owner i maps to prefix first + i
const INDIA_OWNERS: &[(u16, [&str; 3])] = &[
    (720, ["Rajesh Kumar", "Priya Sharma", "Amit Patel"]),
    (730, ["Deepak Singh", "Neha Gupta", "Vikram Malhotra"]),
    (740, ["Arun Reddy", "Kavita Iyer", "Suresh Menon"]),
    (750, ["Mohan Joshi", "Anjali Desai", "Rahul Verma"]),
    (760, ["Krishna Rao", "Sunita Prasad", "Venkat Krishna"]),
    (770, ["Madhavan Nair", "Lakshmi Devi", "Ganesh Pillai"]),
    (780, ["Biswas Roy", "Mukherjee Das", "Chatterjee Sen"]),
    (790, ["Yadav Singh", "Tiwari Mishra", "Pandey Dubey"]),
    (800, ["Sharma Verma", "Patel Shah", "Jain Agarwal"]),
    (810, ["Kumar Sinha", "Singh Thakur", "Yadav Prasad"]),
    (820, ["Menon Nair", "Pillai Iyer", "Krishna Rao"]),
    (830, ["Singh Gill", "Kaur Dhillon", "Brar Sidhu"]),
    (840, ["Mishra Das", "Pattnaik Mohanty", "Sahu Behera"]),
    (850, ["Gogoi Bora", "Hazarika Saikia", "Baruah Deka"]),
    (860, ["Tirkey Oraon", "Munda Ho", "Lakra Soren"]),
    (870, ["Sahu Patel", "Yadav Verma", "Kurmi Patel"]),
    (880, ["Yadav Singh", "Kumar Sharma", "Verma Gupta"]),
    (890, ["Thakur Singh", "Negi Rawat", "Rana Chauhan"]),
    (900, ["Rathore Singh", "Choudhary Meena", "Rajput Chauhan"]),
    (910, ["Negi Bisht", "Rawat Rawat", "Pandey Joshi"]),
    (920, ["Khan Lone", "Bhat Mir", "Ladakh Spiti"]),
    (930, ["Fernandes D'Souza", "Pereira Coutinho", "Almeida Rodrigues"]),
    (940, ["Singh Meitei", "Devi Thokchom", "Kumar Ningthoujam"]),
    (950, ["Lyngdoh Kharbuli", "Sangma Marak", "Syiem Dkhar"]),
    (960, ["Khandu Tuki", "Pul Toko", "Danggen Gamlin"]),
    (970, ["Zoramthanga Lal", "Lalchungnunga Ralte", "Vanlalruata Chhakchhuak"]),
    (980, ["Rio Jamir", "Sema Ao", "Imsong Chang"]),
    (990, ["Tamang Lepcha", "Rai Subba", "Gurung Bhutia"]),
];

const INDIA_BUSINESS_PREFIXES: &[&str] = &[
    "720", "730", "740", "750", "760", "770", "780", "790", "800",
];

const ANGOLA_UNITEL: &[&str] = &["81", "83", "85", "87", "89", "91", "92", "93", "94", "95"];
const ANGOLA_MOVICEL: &[&str] = &["80", "82", "84", "86", "88", "90", "96", "97", "98", "99"];

const ANGOLA_LOCATIONS: &[(&str, &str)] = &[
    ("92", "Luanda - Centro"),
    ("93", "Luanda - Talatona"),
    ("94", "Luanda - Viana"),
    ("95", "Luanda - Cacuaco"),
    ("96", "Luanda - Cazenga"),
    ("97", "Luanda - Kilamba Kiaxi"),
    ("98", "Benguela - Centro"),
    ("99", "Benguela - Lobito"),
    ("90", "Benguela - Catumbela"),
    ("91", "Huíla - Lubango"),
    ("89", "Huíla - Namibe"),
    ("88", "Huíla - Menongue"),
    ("87", "Cuanza Sul - Sumbe"),
    ("86", "Cuanza Sul - Porto Amboim"),
    ("85", "Cuanza Sul - Gabela"),
    ("84", "Cuanza Norte - N'Dalatando"),
    ("83", "Cuanza Norte - Lucala"),
    ("82", "Cuanza Norte - Samba Caju"),
    ("81", "Malanje - Centro"),
    ("80", "Malanje - Cacuso"),
    ("79", "Malanje - Calandula"),
    ("78", "Lunda Norte - Dundo"),
    ("77", "Lunda Norte - Lucapa"),
    ("76", "Lunda Norte - Chitato"),
    ("75", "Lunda Sul - Saurimo"),
    ("74", "Lunda Sul - Muconda"),
    ("73", "Lunda Sul - Dala"),
    ("72", "Moxico - Luena"),
    ("71", "Moxico - Luau"),
    ("70", "Moxico - Luacano"),
    ("69", "Cuando Cubango - Menongue"),
    ("68", "Cuando Cubango - Cuito Cuanavale"),
    ("67", "Cuando Cubango - Cuchi"),
    ("66", "Cunene - Ondjiva"),
    ("65", "Cunene - Namacunde"),
    ("64", "Cunene - Ombadja"),
    ("63", "Huambo - Centro"),
    ("62", "Huambo - Caála"),
    ("61", "Huambo - Ulongue"),
    ("60", "Bié - Kuito"),
    ("59", "Bié - Catabola"),
    ("58", "Bié - Chinguar"),
    ("57", "Uíge - Centro"),
    ("56", "Uíge - Negage"),
    ("55", "Uíge - Sanza Pombo"),
    ("54", "Zaire - M'Banza Kongo"),
    ("53", "Zaire - Soyo"),
    ("52", "Zaire - N'Zeto"),
    ("51", "Cabinda - Centro"),
    ("50", "Cabinda - Buco-Zau"),
    ("49", "Cabinda - Belize"),
    ("48", "Bengo - Caxito"),
    ("47", "Bengo - N'Zeto"),
    ("46", "Bengo - Ambriz"),
];

const ANGOLA_OWNERS: &[(&str, &str)] = &[
    ("92", "João Silva"),
    ("93", "Maria Santos"),
    ("94", "Carlos Ferreira"),
    ("95", "Ana Costa"),
    ("96", "Pedro Oliveira"),
    ("97", "Isabel Mendes"),
    ("98", "Manuel Rodrigues"),
    ("99", "Teresa Alves"),
    ("90", "António Pereira"),
    ("91", "Lucia Martins"),
    ("89", "Francisco Sousa"),
    ("88", "Rosa Lima"),
    ("87", "Miguel Gonçalves"),
    ("86", "Catarina Ribeiro"),
    ("85", "Jorge Carvalho"),
    ("84", "Sofia Nunes"),
    ("83", "Ricardo Monteiro"),
    ("82", "Beatriz Lopes"),
    ("81", "André Fonseca"),
    ("80", "Diana Correia"),
    ("79", "Hugo Teixeira"),
    ("78", "Inês Moreira"),
    ("77", "Tiago Coelho"),
    ("76", "Mariana Barros"),
    ("75", "Bruno Cunha"),
    ("74", "Carolina Pires"),
    ("73", "Diogo Melo"),
    ("72", "Eva Cardoso"),
    ("71", "Filipe Henriques"),
    ("70", "Gabriela Vaz"),
    ("69", "Henrique Araújo"),
    ("68", "Irina Costa"),
    ("67", "João Paulo Rocha"),
    ("66", "Kelly Matos"),
    ("65", "Leonardo Campos"),
    ("64", "Marta Andrade"),
    ("63", "Nuno Brito"),
    ("62", "Olga Freitas"),
    ("61", "Paulo Leite"),
    ("60", "Quitéria Marques"),
    ("59", "Rafael Neves"),
    ("58", "Sara Tavares"),
    ("57", "Tomás Pinheiro"),
    ("56", "Úrsula Guerreiro"),
    ("55", "Vasco Matias"),
    ("54", "Wanda Faria"),
    ("53", "Xavier Esteves"),
    ("52", "Yara Baptista"),
    ("51", "Zé Paulo Cruz"),
    ("50", "Adelaide Miranda"),
    ("49", "Bernardo Lourenço"),
    ("48", "Cecília Sequeira"),
    ("47", "Daniel Valente"),
    ("46", "Elsa Ventura"),
    ("45", "Fernando Borges"),
    ("44", "Graça Amaro"),
    ("43", "Hélder Cordeiro"),
    ("42", "Iris Domingues"),
    ("41", "Jacinto Aguiar"),
    ("40", "Lídia Bernardes"),
    ("39", "Mário Brandão"),
    ("38", "Nádia Brites"),
    ("37", "Octávio Candeias"),
    ("36", "Patrícia Carneiro"),
    ("35", "Quintino Chaves"),
    ("34", "Rita Costa"),
    ("33", "Sérgio Duarte"),
    ("32", "Tânia Fonseca"),
    ("31", "Ulisses Gomes"),
    ("30", "Vera Henriques"),
    ("29", "Wilson Lacerda"),
    ("28", "Xénia Machado"),
];

const ANGOLA_BUSINESS_PREFIXES: &[&str] = &[
    "90", "91", "92", "93", "94", "95", "96", "97", "98", "99",
];

pub(super) fn table() -> NumberOriginTable {
    let mut table = NumberOriginTable::new();

    for (code, name, timezone) in COUNTRIES {
        let mut entry = CountryEntry::new(*name, *timezone);
        entry.regions = match *code {
            "55" => Some(brazil()),
            "91" => Some(india()),
            "244" => Some(angola()),
            _ => None,
        };
        table.insert_code(code, entry);
    }

    table
}

fn brazil() -> RegionTable {
    let mut regions = RegionTable::new(2);
    for (code, carrier, city, owner) in BRAZIL {
        let entry = regions.entry(*code);
        entry.carrier = Some(carrier.to_string());
        entry.location = Some(city.to_string());
        entry.owner = Some(owner.to_string());
    }
    regions
}

fn india() -> RegionTable {
    let mut regions = RegionTable::new(3).with_defaults(RegionDefaults {
        carrier: "Airtel/Vodafone/Jio (Indian carrier)".to_string(),
        location: "India (region not specified)".to_string(),
        ..RegionDefaults::default()
    });

    for prefix in INDIA_AIRTEL_PREFIXES {
        regions.entry(prefix.to_string()).carrier = Some("Airtel".to_string());
    }

    for (first, state, cities) in INDIA_LOCATIONS {
        for (offset, city) in (0u16..).zip(cities.iter()) {
            regions.entry((first + offset).to_string()).location =
                Some(format!("{} - {}", state, city));
        }
    }

    for (first, owners) in INDIA_OWNERS {
        for (offset, owner) in (0u16..).zip(owners.iter()) {
            regions.entry((first + offset).to_string()).owner = Some(owner.to_string());
        }
    }

    for prefix in INDIA_BUSINESS_PREFIXES {
        regions.entry(*prefix).owner_type = Some(OwnerType::Business);
    }

    regions
}

fn angola() -> RegionTable {
    let mut regions = RegionTable::new(2).with_defaults(RegionDefaults {
        carrier: "Unitel/Movicel (Angolan carrier)".to_string(),
        location: "Angola (location not specified)".to_string(),
        ..RegionDefaults::default()
    });

    for code in ANGOLA_UNITEL {
        regions.entry(*code).carrier = Some("Unitel".to_string());
    }
    for code in ANGOLA_MOVICEL {
        regions.entry(*code).carrier = Some("Movicel".to_string());
    }
    for (code, location) in ANGOLA_LOCATIONS {
        regions.entry(*code).location = Some(location.to_string());
    }
    for (code, owner) in ANGOLA_OWNERS {
        regions.entry(*code).owner = Some(owner.to_string());
    }
    for code in ANGOLA_BUSINESS_PREFIXES {
        regions.entry(*code).owner_type = Some(OwnerType::Business);
    }

    regions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_calling_code_is_registered() {
        assert_eq!(table().len(), COUNTRIES.len());
    }

    #[test]
    fn india_prefixes_cover_the_airtel_range() {
        let regions = india();
        assert_eq!(regions.width(), 3);
        assert!(regions.lookup("9991234").1.is_some());
        assert!(regions.lookup("7191234").1.is_none());
    }
}
